pub mod app;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

pub use application::{map_rows, CsvLoadUseCase, LoadReport, TableSchemaManager};
pub use domain::error::{LoadError, Result};
pub use infrastructure::db::{Database, QueryExecutor};
