//! Row insertion.

use crate::error::Result;
use crate::schema::quote_ident;
use crate::storage::retry::{with_retry, RetryPolicy};
use rusqlite::{params_from_iter, Connection};
use std::collections::BTreeMap;

/// Inserts normalized records into one target table.
///
/// Records arrive with sanitized column names and stringified values; the
/// writer binds every value as a parameter, so content never needs SQL
/// escaping. Keys absent from a record are simply not named in its INSERT
/// and stay NULL.
pub struct RowWriter<'conn> {
    conn: &'conn Connection,
    table: String,
    policy: RetryPolicy,
}

impl<'conn> RowWriter<'conn> {
    pub fn new(conn: &'conn Connection, table: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            conn,
            table: table.into(),
            policy,
        }
    }

    /// Insert one record, retrying on transient lock contention.
    ///
    /// A record with no columns still produces a row: the surrogate key is
    /// assigned and every data column stays NULL.
    pub fn insert(&self, record: &BTreeMap<String, String>) -> Result<()> {
        let sql = if record.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", quote_ident(&self.table))
        } else {
            let columns: Vec<String> = record.keys().map(|column| quote_ident(column)).collect();
            let placeholders = vec!["?"; record.len()].join(", ");
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(&self.table),
                columns.join(", "),
                placeholders
            )
        };

        with_retry(&self.policy, "insert row", || {
            self.conn.execute(&sql, params_from_iter(record.values()))
        })?;
        Ok(())
    }
}
