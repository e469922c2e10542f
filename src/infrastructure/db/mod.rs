pub mod connection;
pub mod executor;

pub use connection::Database;
pub use executor::QueryExecutor;
