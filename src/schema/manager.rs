//! Schema Manager
//!
//! Owns table creation and incremental schema evolution. The table is
//! created from the key union of the whole document; before every insert
//! the live column set is re-checked so records that introduce unseen keys
//! extend the table instead of failing. Columns are only ever added, never
//! removed, and every data column is TEXT.

use crate::error::{IngestError, Result};
use crate::schema::ident::{quote_ident, sanitize_identifier};
use crate::schema::ROW_ID_COLUMN;
use crate::storage::{with_retry, RetryPolicy};
use rusqlite::Connection;
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Creates and evolves one target table over a borrowed connection.
///
/// Inside the ingest pipeline the connection is a deferred transaction, so
/// the CREATE issued here is the run's first write and the point where
/// contention with another writer surfaces; every statement therefore runs
/// under the retry policy. DDL rolls back together with the row inserts if
/// the run fails.
pub struct SchemaManager<'conn> {
    conn: &'conn Connection,
    table: String,
    policy: RetryPolicy,
}

impl<'conn> SchemaManager<'conn> {
    pub fn new(conn: &'conn Connection, table: impl Into<String>, policy: RetryPolicy) -> Self {
        Self {
            conn,
            table: table.into(),
            policy,
        }
    }

    /// Create the table if it does not exist: a surrogate integer primary
    /// key plus one TEXT column per sanitized key.
    ///
    /// Idempotent; a no-op when the table is already there. Safe for an
    /// empty key set, which yields a table holding only the surrogate key.
    pub fn create_table<'k, K>(&self, keys: K) -> Result<()>
    where
        K: IntoIterator<Item = &'k String>,
    {
        let columns = sanitized_key_set(keys)?;

        let mut defs = Vec::with_capacity(columns.len() + 1);
        defs.push(format!("{} INTEGER PRIMARY KEY", quote_ident(ROW_ID_COLUMN)));
        defs.extend(columns.iter().map(|column| format!("{} TEXT", quote_ident(column))));

        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            quote_ident(&self.table),
            defs.join(", ")
        );
        with_retry(&self.policy, "create table", || self.conn.execute(&sql, []))?;
        info!(table = %self.table, data_columns = columns.len(), "table ready");
        Ok(())
    }

    /// Current column names of the table, lower-cased.
    pub fn columns(&self) -> Result<BTreeSet<String>> {
        let sql = format!("PRAGMA table_info({})", quote_ident(&self.table));
        with_retry(&self.policy, "inspect schema", || {
            let mut stmt = self.conn.prepare(&sql)?;
            let names = stmt.query_map([], |row| row.get::<_, String>(1))?;

            let mut columns = BTreeSet::new();
            for name in names {
                columns.insert(name?.to_lowercase());
            }
            Ok(columns)
        })
    }

    /// Add a TEXT column for every sanitized key not already present,
    /// compared case-insensitively against the live schema.
    ///
    /// This runs before every record insert; it is what lets a
    /// heterogeneous document (or a re-run against an existing database)
    /// grow the table on the fly. Returns the columns actually added.
    pub fn add_missing_columns<'k, K>(&self, keys: K) -> Result<Vec<String>>
    where
        K: IntoIterator<Item = &'k String>,
    {
        let existing = self.columns()?;
        let mut added = Vec::new();

        for column in sanitized_key_set(keys)? {
            if existing.contains(&column) {
                continue;
            }
            let sql = format!(
                "ALTER TABLE {} ADD COLUMN {} TEXT",
                quote_ident(&self.table),
                quote_ident(&column)
            );
            with_retry(&self.policy, "add column", || self.conn.execute(&sql, []))?;
            debug!(table = %self.table, column = %column, "schema extended");
            added.push(column);
        }

        Ok(added)
    }
}

/// Sanitize and deduplicate a key collection, rejecting the surrogate key
/// name. Distinct raw keys that sanitize alike collapse into one column
/// here; the per-record collision check lives in `sanitize_record`.
fn sanitized_key_set<'k, K>(keys: K) -> Result<BTreeSet<String>>
where
    K: IntoIterator<Item = &'k String>,
{
    let mut columns = BTreeSet::new();
    for key in keys {
        let column = sanitize_identifier(key);
        if column == ROW_ID_COLUMN {
            return Err(IngestError::ReservedColumn(key.clone()));
        }
        columns.insert(column);
    }
    Ok(columns)
}
