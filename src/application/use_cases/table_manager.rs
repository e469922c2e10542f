use crate::domain::csv::MappedRow;
use crate::domain::error::{LoadError, Result};
use crate::domain::table::TableDefinition;
use crate::domain::value::{Record, SqlValue};
use crate::infrastructure::db::QueryExecutor;
use tracing::{debug, error, info};

/// Owns one table's DDL and insert shape.
///
/// Holds no state besides the borrowed executor; whether the table exists is
/// never cached and is re-asserted by `ensure_table_exists` on every run.
pub struct TableSchemaManager {
    executor: QueryExecutor,
    table: TableDefinition,
}

impl TableSchemaManager {
    pub fn new(executor: QueryExecutor, table: TableDefinition) -> Self {
        Self { executor, table }
    }

    pub fn table(&self) -> &TableDefinition {
        &self.table
    }

    pub fn create_table_sql(&self) -> String {
        self.table.create_table_sql(self.executor.dialect())
    }

    pub fn insert_sql(&self) -> String {
        self.table.insert_sql(self.executor.dialect())
    }

    pub async fn ensure_table_exists(&self) -> Result<()> {
        self.executor
            .execute(&self.create_table_sql(), None)
            .await
            .map_err(|e| {
                error!(table = %self.table.name, error = %e, "Failed to create table");
                LoadError::Schema {
                    table: self.table.name.clone(),
                    message: e.to_string(),
                }
            })?;

        debug!(table = %self.table.name, "Table ensured");
        Ok(())
    }

    /// Check every row against the insert shape without touching the database.
    pub fn validate(&self, rows: &[MappedRow]) -> Result<()> {
        self.build_params(rows).map(|_| ())
    }

    /// Insert all rows as one atomic batch. Returns the number of rows affected.
    ///
    /// Rows are checked before any statement is issued, so a bad row leaves the
    /// table untouched.
    pub async fn insert(&self, rows: &[MappedRow]) -> Result<u64> {
        if rows.is_empty() {
            debug!(table = %self.table.name, "Nothing to insert");
            return Ok(0);
        }

        let params_list = self.build_params(rows)?;
        let affected = self
            .executor
            .execute_batch(&self.insert_sql(), &params_list)
            .await
            .map_err(|e| match e {
                LoadError::BatchExecution { row, message } => LoadError::BatchExecution {
                    // Report the CSV row rather than the position in the batch
                    row: row.and_then(|i| rows.get(i)).map(|r| r.index),
                    message: format!("table '{}': {}", self.table.name, message),
                },
                other => other,
            })?;

        info!(table = %self.table.name, rows = rows.len(), "Inserted rows");
        Ok(affected)
    }

    /// All rows of the table ordered by primary key.
    pub async fn fetch_all(&self) -> Result<Vec<Record>> {
        self.executor.execute(&self.table.select_all_sql(), None).await
    }

    fn build_params(&self, rows: &[MappedRow]) -> Result<Vec<Vec<SqlValue>>> {
        rows.iter().map(|row| self.row_params(row)).collect()
    }

    fn row_params(&self, row: &MappedRow) -> Result<Vec<SqlValue>> {
        self.table
            .insertable_columns()
            .map(|column| {
                let mismatch = |message: String| LoadError::ColumnMismatch {
                    table: self.table.name.clone(),
                    row: row.index,
                    column: column.name.clone(),
                    message,
                };

                let raw = row
                    .get(&column.name)
                    .ok_or_else(|| mismatch("column missing from mapped row".to_string()))?;
                column
                    .column_type
                    .convert(raw, column.nullable)
                    .map_err(mismatch)
            })
            .collect()
    }
}
