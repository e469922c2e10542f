pub mod use_cases;

pub use use_cases::column_mapper::map_rows;
pub use use_cases::csv_load::{CsvLoadUseCase, LoadReport, TableLoadSummary};
pub use use_cases::table_manager::TableSchemaManager;
