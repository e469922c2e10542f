use std::path::PathBuf;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::application::{CsvLoadUseCase, LoadReport};
use crate::domain::error::Result;
use crate::domain::table::TableDefinition;
use crate::infrastructure::config::{LoaderConfig, DEFAULT_CONFIG_FILE};
use crate::infrastructure::csv::CsvParser;
use crate::infrastructure::db::Database;

/// Inputs the entry point may override on top of the loaded configuration.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config_path: PathBuf,
    pub csv_path: Option<PathBuf>,
    pub database_url: Option<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            csv_path: None,
            database_url: None,
        }
    }
}

/// `RUST_LOG` wins over the default `info` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// One complete load. The connection is closed before returning, on success and on failure.
pub async fn run(options: RunOptions) -> Result<LoadReport> {
    let mut config = LoaderConfig::load(&options.config_path)?;
    if let Some(csv_path) = options.csv_path {
        config.csv.path = csv_path;
    }
    if let Some(database_url) = options.database_url {
        config.database.url = Some(database_url);
    }

    let parser = CsvParser::new()
        .with_delimiter(config.csv.delimiter_byte()?)
        .with_trim(config.csv.trim);
    let database_url = config.database.connection_url()?;

    let database = Database::connect(&database_url).await?;
    let outcome = load(&database, &config, &parser).await;
    database.close().await;

    match &outcome {
        Ok(report) => info!(rows = report.rows_read, "CSV load finished"),
        Err(err) => error!(error = %err, csv = %config.csv.path.display(), "CSV load failed"),
    }
    outcome
}

async fn load(database: &Database, config: &LoaderConfig, parser: &CsvParser) -> Result<LoadReport> {
    let use_case = CsvLoadUseCase::new(
        database.executor(),
        config.mapping.clone(),
        TableDefinition::builtin(),
    )?;
    use_case.load_file(parser, &config.csv.path).await
}
