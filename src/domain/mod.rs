pub mod dialect;
pub mod error;
pub mod mapping;
pub mod table;
pub mod value;

// CSV row types
pub mod csv;
