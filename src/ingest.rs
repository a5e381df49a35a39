//! Ingest facade.
//!
//! Wires the full pipeline: open the database, load the document, collect
//! the key union, create the table, then per record normalize, sanitize,
//! extend the schema, and insert. Everything runs inside one deferred
//! transaction committed at the end, so a failed run rolls back the row
//! inserts and the CREATE/ALTER statements with them.

use crate::document::{normalize_record, Document};
use crate::error::{IngestError, Result};
use crate::schema::{sanitize_identifier, sanitize_record, SchemaManager, ROW_ID_COLUMN};
use crate::storage::{open_with_retry, RetryPolicy, RowWriter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Settings for one ingest run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    input_path: PathBuf,
    db_path: PathBuf,
    table_name: Option<String>,
    retry: RetryPolicy,
}

impl IngestConfig {
    pub fn new(input_path: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            db_path: db_path.into(),
            table_name: None,
            retry: RetryPolicy::default(),
        }
    }

    /// Use `name` instead of the table name derived from the input file.
    /// The name is honored as given (quoted at use sites, not sanitized).
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// What one successful run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    /// Target table name.
    pub table: String,
    /// Rows written, one per record.
    pub rows_inserted: usize,
    /// Data columns in the table after the run, surrogate key excluded.
    pub data_columns: usize,
    /// Columns added by the per-record safety net. Zero on a fresh run,
    /// since the table starts from the full key union; nonzero when a run
    /// extends a table created earlier.
    pub columns_added: usize,
}

/// Derive the target table name from the input file: base name with the
/// extension stripped, sanitized.
pub fn table_name_from_path(path: &Path) -> Result<String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| IngestError::MalformedInput {
            path: path.to_path_buf(),
            message: "no file name to derive a table name from".to_string(),
        })?;
    Ok(sanitize_identifier(stem))
}

/// Ingest the configured document into the configured database.
pub fn run(config: &IngestConfig) -> Result<IngestReport> {
    let mut conn = open_with_retry(&config.db_path, &config.retry)?;
    let document = Document::load(&config.input_path)?;
    let table = match &config.table_name {
        Some(name) => name.clone(),
        None => table_name_from_path(&config.input_path)?,
    };
    info!(
        input = %config.input_path.display(),
        table = %table,
        records = document.len(),
        "ingest started"
    );

    let keys = document.key_set();
    let tx = conn.transaction()?;

    let mut rows_inserted = 0;
    let mut columns_added = 0;
    let data_columns;
    {
        let manager = SchemaManager::new(&tx, &table, config.retry.clone());
        let writer = RowWriter::new(&tx, &table, config.retry.clone());

        manager.create_table(&keys)?;

        for record in document.records() {
            let row = sanitize_record(normalize_record(record))?;
            columns_added += manager.add_missing_columns(row.keys())?.len();
            writer.insert(&row)?;
            rows_inserted += 1;
        }

        data_columns = manager
            .columns()?
            .into_iter()
            .filter(|column| column != ROW_ID_COLUMN)
            .count();
    }
    tx.commit()?;

    info!(table = %table, rows = rows_inserted, data_columns, "ingest committed");

    Ok(IngestReport {
        table,
        rows_inserted,
        data_columns,
        columns_added,
    })
}
