use crate::domain::dialect::Dialect;
use crate::domain::error::{LoadError, Result};
use crate::domain::value::{NullKind, Record, SqlValue};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::AnyPool;
use sqlx::query::Query;
use sqlx::{Any, Column, Row};
use tracing::{debug, error, warn};

type AnyQuery<'q> = Query<'q, Any, AnyArguments<'q>>;

/// Runs parameterized statements against the shared session.
///
/// Cheap to clone; every clone borrows the same pool.
#[derive(Clone)]
pub struct QueryExecutor {
    pool: AnyPool,
    dialect: Dialect,
}

impl QueryExecutor {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Run one statement and return its result rows (empty for DDL and DML).
    ///
    /// The connection is checked out for the duration of the call and goes back to
    /// the pool on every exit path, including a failed statement.
    pub async fn execute(&self, query: &str, params: Option<&[SqlValue]>) -> Result<Vec<Record>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| LoadError::Execution(format!("Failed to acquire connection: {e}")))?;

        let rows = bind_params(sqlx::query(query), params.unwrap_or_default())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                warn!(error = %e, "Statement failed");
                LoadError::Execution(format!("Failed to execute statement: {e}"))
            })?;

        debug!(rows = rows.len(), "Statement executed");
        Ok(rows.iter().map(to_record).collect())
    }

    /// Run `query` once per parameter set inside one transaction.
    ///
    /// Either every parameter set is committed or none is. The error names the
    /// index of the first parameter set that failed.
    pub async fn execute_batch(&self, query: &str, params_list: &[Vec<SqlValue>]) -> Result<u64> {
        if params_list.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(|e| LoadError::BatchExecution {
            row: None,
            message: format!("Failed to begin transaction: {e}"),
        })?;

        let mut affected: u64 = 0;
        for (index, params) in params_list.iter().enumerate() {
            match bind_params(sqlx::query(query), params)
                .execute(&mut *tx)
                .await
            {
                Ok(result) => affected += result.rows_affected(),
                Err(e) => {
                    warn!(row = index, error = %e, "Batch statement failed, rolling back");
                    if let Err(rollback_err) = tx.rollback().await {
                        error!(error = %rollback_err, "Failed to roll back batch");
                    }
                    return Err(LoadError::BatchExecution {
                        row: Some(index),
                        message: e.to_string(),
                    });
                }
            }
        }

        tx.commit().await.map_err(|e| LoadError::BatchExecution {
            row: None,
            message: format!("Failed to commit transaction: {e}"),
        })?;

        debug!(rows = params_list.len(), affected, "Batch committed");
        Ok(affected)
    }
}

fn bind_params<'q>(query: AnyQuery<'q>, params: &[SqlValue]) -> AnyQuery<'q> {
    params.iter().fold(query, |query, value| match value {
        SqlValue::Null | SqlValue::TypedNull(NullKind::Text) => query.bind(Option::<String>::None),
        SqlValue::TypedNull(NullKind::Int) => query.bind(Option::<i64>::None),
        SqlValue::TypedNull(NullKind::Float) => query.bind(Option::<f64>::None),
        SqlValue::Int(v) => query.bind(*v),
        SqlValue::Float(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Bool(v) => query.bind(*v),
    })
}

fn to_record(row: &AnyRow) -> Record {
    let columns = row
        .columns()
        .iter()
        .map(|column| (column.name().to_string(), decode_column(row, column.ordinal())))
        .collect();
    Record { columns }
}

/// Drivers report different storage types for the same column (MySQL FLOAT is
/// single precision, SQLite REAL is double), so try the widest types first.
fn decode_column(row: &AnyRow, index: usize) -> SqlValue {
    if let Ok(value) = row.try_get::<Option<i64>, _>(index) {
        return value.map(SqlValue::Int).unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<i32>, _>(index) {
        return value
            .map(|v| SqlValue::Int(i64::from(v)))
            .unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(index) {
        return value.map(SqlValue::Float).unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<f32>, _>(index) {
        return value
            .map(|v| SqlValue::Float(f64::from(v)))
            .unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<String>, _>(index) {
        return value.map(SqlValue::Text).unwrap_or(SqlValue::Null);
    }
    if let Ok(value) = row.try_get::<Option<bool>, _>(index) {
        return value.map(SqlValue::Bool).unwrap_or(SqlValue::Null);
    }
    debug!(column = index, "Unsupported column type, reading as NULL");
    SqlValue::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::Database;

    const CREATE_ITEMS: &str =
        "CREATE TABLE IF NOT EXISTS items (id INTEGER PRIMARY KEY AUTOINCREMENT, label TEXT NOT NULL)";

    async fn items_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.executor().execute(CREATE_ITEMS, None).await.unwrap();
        db
    }

    async fn count_items(executor: &QueryExecutor) -> i64 {
        let rows = executor
            .execute("SELECT COUNT(*) AS n FROM items", None)
            .await
            .unwrap();
        rows[0].get("n").and_then(SqlValue::as_i64).unwrap()
    }

    #[tokio::test]
    async fn test_execute_returns_rows() {
        let db = items_db().await;
        let executor = db.executor();

        executor
            .execute(
                "INSERT INTO items (label) VALUES (?)",
                Some(&[SqlValue::from("first")][..]),
            )
            .await
            .unwrap();

        let rows = executor
            .execute("SELECT id, label FROM items", None)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("id"), Some(&SqlValue::Int(1)));
        assert_eq!(rows[0].get("label").and_then(SqlValue::as_str), Some("first"));
    }

    #[tokio::test]
    async fn test_malformed_statement_is_execution_error() {
        let db = items_db().await;
        let executor = db.executor();

        let err = executor.execute("SELEC nope", None).await.unwrap_err();
        assert!(matches!(err, LoadError::Execution(_)));

        // The connection went back to the pool
        assert_eq!(count_items(&executor).await, 0);
    }

    #[tokio::test]
    async fn test_batch_commits_all_rows() {
        let db = items_db().await;
        let executor = db.executor();

        let params = vec![
            vec![SqlValue::from("a")],
            vec![SqlValue::from("b")],
            vec![SqlValue::from("c")],
        ];
        let affected = executor
            .execute_batch("INSERT INTO items (label) VALUES (?)", &params)
            .await
            .unwrap();

        assert_eq!(affected, 3);
        assert_eq!(count_items(&executor).await, 3);
    }

    #[tokio::test]
    async fn test_batch_is_atomic_on_not_null_violation() {
        let db = items_db().await;
        let executor = db.executor();

        let params = vec![
            vec![SqlValue::from("a")],
            vec![SqlValue::Null],
            vec![SqlValue::from("c")],
        ];
        let err = executor
            .execute_batch("INSERT INTO items (label) VALUES (?)", &params)
            .await
            .unwrap_err();

        match err {
            LoadError::BatchExecution { row, .. } => assert_eq!(row, Some(1)),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(count_items(&executor).await, 0);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        // No table exists, so any issued statement would fail
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let affected = db
            .executor()
            .execute_batch("INSERT INTO missing (x) VALUES (?)", &[])
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_typed_nulls_bind_into_nullable_columns() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let executor = db.executor();
        executor
            .execute(
                "CREATE TABLE optional (qty INT NULL, price FLOAT NULL, note TEXT NULL)",
                None,
            )
            .await
            .unwrap();

        let params = vec![vec![
            SqlValue::TypedNull(NullKind::Int),
            SqlValue::TypedNull(NullKind::Float),
            SqlValue::TypedNull(NullKind::Text),
        ]];
        executor
            .execute_batch("INSERT INTO optional (qty, price, note) VALUES (?, ?, ?)", &params)
            .await
            .unwrap();

        let rows = executor
            .execute("SELECT qty, price, note FROM optional", None)
            .await
            .unwrap();
        for column in ["qty", "price", "note"] {
            assert_eq!(rows[0].get(column), Some(&SqlValue::Null));
        }
    }

    #[tokio::test]
    async fn test_float_round_trip() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let executor = db.executor();
        executor
            .execute("CREATE TABLE money (amount FLOAT NOT NULL)", None)
            .await
            .unwrap();
        executor
            .execute_batch(
                "INSERT INTO money (amount) VALUES (?)",
                &[vec![SqlValue::Float(19.99)]],
            )
            .await
            .unwrap();

        let rows = executor.execute("SELECT amount FROM money", None).await.unwrap();
        let amount = rows[0].get("amount").and_then(SqlValue::as_f64).unwrap();
        assert!((amount - 19.99).abs() < 1e-6);
    }
}
