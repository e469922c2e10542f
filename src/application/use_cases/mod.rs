pub mod column_mapper;
pub mod csv_load;
pub mod table_manager;
