pub mod csv_source;
pub mod row;
pub mod traits;
