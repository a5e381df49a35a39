//! Identifier Sanitizer
//!
//! Maps arbitrary JSON key names onto valid SQLite column identifiers.
//! The mapping is pure and deterministic: replace every character outside
//! `[A-Za-z0-9_]` with an underscore, prefix an underscore when the result
//! starts with a digit, then lower-case. The output alphabet is exactly
//! `[a-z0-9_]`, never starting with a digit, and sanitizing an already
//! sanitized identifier is a no-op.

use crate::error::{IngestError, Result};
use crate::schema::ROW_ID_COLUMN;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static::lazy_static! {
    static ref NON_IDENT_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_]").unwrap();
}

/// Sanitize one key into a column identifier.
///
/// Two distinct raw keys may sanitize to the same identifier; whether that
/// is acceptable depends on where they came from. Across records the keys
/// simply share a column, while inside one record the collision would drop
/// a value and is rejected by [`sanitize_record`].
pub fn sanitize_identifier(key: &str) -> String {
    let mut ident = NON_IDENT_CHARS.replace_all(key, "_").into_owned();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if ident.is_empty() {
        // An empty key still needs a usable column name.
        ident.push('_');
    }
    ident.to_lowercase()
}

/// Sanitize every key of a normalized record, failing fast on collisions.
///
/// Returns the record re-keyed by sanitized column names. Two raw keys of
/// the same record mapping to one column raise
/// [`IngestError::ColumnCollision`]; a key mapping to the surrogate
/// primary key raises [`IngestError::ReservedColumn`].
pub fn sanitize_record(record: BTreeMap<String, String>) -> Result<BTreeMap<String, String>> {
    let mut sanitized = BTreeMap::new();
    let mut sources: BTreeMap<String, String> = BTreeMap::new();

    for (key, value) in record {
        let column = sanitize_identifier(&key);
        if column == ROW_ID_COLUMN {
            return Err(IngestError::ReservedColumn(key));
        }
        if let Some(first) = sources.get(&column) {
            return Err(IngestError::ColumnCollision {
                first: first.clone(),
                second: key,
                column,
            });
        }
        sources.insert(column.clone(), key);
        sanitized.insert(column, value);
    }

    Ok(sanitized)
}

/// Double-quote an identifier for interpolation into SQL.
///
/// Sanitized names contain nothing that needs escaping, but quoting keeps
/// names that happen to be SQL keywords (`table`, `order`, ...) valid.
pub fn quote_ident(ident: &str) -> String {
    let escaped = ident.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_non_identifier_characters() {
        assert_eq!(sanitize_identifier("user name"), "user_name");
        assert_eq!(sanitize_identifier("price-usd"), "price_usd");
        assert_eq!(sanitize_identifier("a.b.c"), "a_b_c");
        assert_eq!(sanitize_identifier("naïve"), "na_ve");
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(sanitize_identifier("UserName"), "username");
        assert_eq!(sanitize_identifier("ID"), "id");
    }

    #[test]
    fn test_leading_digit_gets_prefixed() {
        assert_eq!(sanitize_identifier("9lives"), "_9lives");
        assert_eq!(sanitize_identifier("2nd-place"), "_2nd_place");
    }

    #[test]
    fn test_empty_key_becomes_underscore() {
        assert_eq!(sanitize_identifier(""), "_");
    }

    #[test]
    fn test_idempotent() {
        for key in ["User Name!", "9lives", "", "already_clean", "Ünïcode"] {
            let once = sanitize_identifier(key);
            assert_eq!(sanitize_identifier(&once), once);
        }
    }

    #[test]
    fn test_output_alphabet() {
        for key in ["crazy key!!", "1234", "émail@host", "\"quoted\""] {
            let ident = sanitize_identifier(key);
            assert!(!ident.is_empty());
            assert!(!ident.starts_with(|c: char| c.is_ascii_digit()));
            assert!(
                ident
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
                "unexpected character in '{ident}'"
            );
        }
    }

    #[test]
    fn test_sanitize_record_rekeys() {
        let record = BTreeMap::from([
            ("User Name".to_string(), "x".to_string()),
            ("age".to_string(), "3".to_string()),
        ]);
        let sanitized = sanitize_record(record).unwrap();
        assert_eq!(sanitized["user_name"], "x");
        assert_eq!(sanitized["age"], "3");
    }

    #[test]
    fn test_same_record_collision_fails_fast() {
        let record = BTreeMap::from([
            ("user name".to_string(), "a".to_string()),
            ("user-name".to_string(), "b".to_string()),
        ]);
        let err = sanitize_record(record).unwrap_err();
        match err {
            IngestError::ColumnCollision {
                first,
                second,
                column,
            } => {
                assert_eq!(first, "user name");
                assert_eq!(second, "user-name");
                assert_eq!(column, "user_name");
            }
            other => panic!("expected ColumnCollision, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_surrogate_key_rejected() {
        let record = BTreeMap::from([("Row-ID".to_string(), "1".to_string())]);
        assert!(matches!(
            sanitize_record(record),
            Err(IngestError::ReservedColumn(key)) if key == "Row-ID"
        ));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("users"), "\"users\"");
        assert_eq!(quote_ident("table"), "\"table\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
