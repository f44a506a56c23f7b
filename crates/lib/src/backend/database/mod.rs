//! Database-style backend implementations
//!
//! These backends hold the whole credential table and hand out fresh copies
//! of it per operation.

mod csv_file;
mod in_memory;

pub use csv_file::CsvFileStorage;
pub use in_memory::InMemoryStorage;
