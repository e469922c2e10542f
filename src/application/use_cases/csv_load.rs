use crate::application::use_cases::column_mapper::map_rows;
use crate::application::use_cases::table_manager::TableSchemaManager;
use crate::domain::csv::CsvRow;
use crate::domain::error::{LoadError, Result};
use crate::domain::mapping::Mapping;
use crate::domain::table::TableDefinition;
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::db::QueryExecutor;
use serde::Serialize;
use std::path::Path;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableLoadSummary {
    pub table: String,
    pub inserted: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub tables: Vec<TableLoadSummary>,
}

/// Sequences a load: map, validate, create tables, insert.
pub struct CsvLoadUseCase {
    mapping: Mapping,
    managers: Vec<TableSchemaManager>,
}

impl CsvLoadUseCase {
    /// Fails if the mapping does not fit the tables.
    pub fn new(
        executor: QueryExecutor,
        mapping: Mapping,
        tables: Vec<TableDefinition>,
    ) -> Result<Self> {
        mapping.validate_against(&tables)?;
        let managers = tables
            .into_iter()
            .map(|table| TableSchemaManager::new(executor.clone(), table))
            .collect();
        Ok(Self { mapping, managers })
    }

    pub fn managers(&self) -> &[TableSchemaManager] {
        &self.managers
    }

    /// Parse `path` and load it. Header coverage is checked before any row is mapped.
    pub async fn load_file(&self, parser: &CsvParser, path: &Path) -> Result<LoadReport> {
        let document = parser.parse_file(path)?;

        let missing = self.mapping.missing_sources(&document.headers);
        if let Some(first) = missing.first() {
            error!(path = %path.display(), missing = ?missing, "CSV header lacks mapped columns");
            return Err(LoadError::MissingField {
                source_key: first.to_string(),
                row: 0,
            });
        }

        self.run(&document.rows).await
    }

    /// Load already parsed rows.
    ///
    /// Every row is mapped and checked against every table before the first
    /// statement is issued. All tables are ensured before any insert, then each
    /// table's rows go in as one transaction.
    pub async fn run(&self, rows: &[CsvRow]) -> Result<LoadReport> {
        let mapped = map_rows(rows, &self.mapping)?;
        for manager in &self.managers {
            manager.validate(&mapped)?;
        }

        for manager in &self.managers {
            manager.ensure_table_exists().await?;
        }

        let mut tables = Vec::with_capacity(self.managers.len());
        for manager in &self.managers {
            let inserted = manager.insert(&mapped).await?;
            tables.push(TableLoadSummary {
                table: manager.table().name.clone(),
                inserted,
            });
        }

        info!(rows = rows.len(), tables = tables.len(), "Load complete");
        Ok(LoadReport {
            rows_read: rows.len(),
            tables,
        })
    }
}
