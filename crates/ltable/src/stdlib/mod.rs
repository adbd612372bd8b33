// Library-facing adapters built on the table engine
pub mod sort_table;
