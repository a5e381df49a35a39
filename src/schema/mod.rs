//! Schema inference and evolution.
//!
//! Identifier sanitization turns raw JSON keys into SQLite column names;
//! the manager materializes those names as a table and widens it as new
//! keys appear.

mod ident;
mod manager;

pub use ident::{quote_ident, sanitize_identifier, sanitize_record};
pub use manager::SchemaManager;

/// Surrogate primary key present in every target table. Documents may not
/// carry a key that sanitizes to this name.
pub const ROW_ID_COLUMN: &str = "row_id";
