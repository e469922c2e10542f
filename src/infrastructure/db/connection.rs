use crate::domain::dialect::Dialect;
use crate::domain::error::{LoadError, Result};
use crate::infrastructure::db::executor::QueryExecutor;
use sqlx::any::AnyPoolOptions;
use sqlx::AnyPool;
use std::time::Duration;
use tracing::{error, info};

/// The single database session of a load run.
///
/// The pool is capped at one connection and never reaps it, so every statement
/// of the run (including an in-memory SQLite database) sees the same session.
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
}

impl Database {
    pub async fn connect(database_url: &str) -> Result<Self> {
        sqlx::any::install_default_drivers();
        let dialect = Dialect::from_url(database_url)?;

        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect(database_url)
            .await
            .map_err(|e| {
                error!(dialect = ?dialect, error = %e, "Failed to connect database");
                LoadError::Execution(format!("Failed to connect: {e}"))
            })?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| LoadError::Execution(format!("Database health check failed: {e}")))?;

        info!(dialect = ?dialect, "Database connected");
        Ok(Self { pool, dialect })
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Lend the session to a component.
    pub fn executor(&self) -> QueryExecutor {
        QueryExecutor::new(self.pool.clone(), self.dialect)
    }

    /// Release the session. Waits for borrowed connections to be returned.
    pub async fn close(self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}
