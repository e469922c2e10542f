// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Row types on both sides of the column mapping
// No I/O, no async, no external dependencies

mod csv_row;
mod mapped_row;

pub use csv_row::{CsvField, CsvRow};
pub use mapped_row::MappedRow;
