//! Database schema model

mod database_model;
mod elements;
mod loader;

pub use database_model::Database;
pub use elements::*;
pub use loader::{parse_schema, parse_schema_str};

pub(crate) use loader::read_file_with_encoding_fallback;
