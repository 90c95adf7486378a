pub mod csv_table;
pub mod mapping;

pub use csv_table::{load_unit_table, read_unit_table, save_unit_table, write_unit_table};
pub use mapping::{save_mapping, write_mapping};
