// ============================================================================
// jsonsink Library
// ============================================================================

pub mod document;
pub mod error;
pub mod ingest;
pub mod schema;
pub mod storage;

// Re-export main types for convenience
pub use document::Document;
pub use error::{IngestError, Result};
pub use ingest::{run, IngestConfig, IngestReport};
pub use schema::{SchemaManager, ROW_ID_COLUMN};
pub use storage::{open_with_retry, RetryPolicy, RowWriter};

// ============================================================================
// High-level API
// ============================================================================

/// Ingest one JSON file into a SQLite database with default settings.
///
/// The table is named after the input file and its schema is inferred from
/// the document's keys. For a custom table name or retry policy, build an
/// [`IngestConfig`] and call [`run`].
///
/// # Examples
///
/// ```
/// use jsonsink::ingest_file;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let input = dir.path().join("events.json");
/// std::fs::write(&input, r#"[{"id": 1, "name": "ada"}]"#)?;
///
/// let report = ingest_file(&input, dir.path().join("events.db"))?;
/// assert_eq!(report.table, "events");
/// assert_eq!(report.rows_inserted, 1);
/// # Ok(())
/// # }
/// ```
pub fn ingest_file(
    input: impl AsRef<std::path::Path>,
    db: impl AsRef<std::path::Path>,
) -> Result<IngestReport> {
    run(&IngestConfig::new(input.as_ref(), db.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.json");
        std::fs::write(&input, r#"[{"id": 1, "name": "ada"}, {"id": 2}]"#).unwrap();
        let db = dir.path().join("people.db");

        let report = ingest_file(&input, &db).unwrap();

        assert_eq!(report.table, "people");
        assert_eq!(report.rows_inserted, 2);
        assert_eq!(report.data_columns, 2);

        let conn = rusqlite::Connection::open(&db).unwrap();
        let name: Option<String> = conn
            .query_row("SELECT name FROM people WHERE id = '1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(name.as_deref(), Some("ada"));
    }

    #[test]
    fn test_run_with_table_override() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.json");
        std::fs::write(&input, r#"{"k": "v"}"#).unwrap();

        let config =
            IngestConfig::new(&input, dir.path().join("out.db")).with_table_name("target");
        let report = run(&config).unwrap();

        assert_eq!(report.table, "target");
        assert_eq!(report.rows_inserted, 1);
    }
}
