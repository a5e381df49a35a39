//! Input document handling
//!
//! - `keys.rs` - recursive key collection over parsed JSON
//! - `normalize.rs` - per-record conversion of every value to text
//!
//! The parsed input is a tagged variant over {null, bool, number, string,
//! array, object} (`serde_json::Value`); the collector and the normalizer
//! both dispatch over that tag. A `Document` is the ephemeral in-memory
//! form of one input file, discarded once its rows are written.

mod keys;
mod normalize;

pub use keys::collect_keys;
pub use normalize::normalize_record;

use crate::error::{IngestError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// One parsed input document, split into records.
///
/// A top-level object is a single record; a top-level array contributes
/// one record per element. Anything else is rejected up front, as is an
/// array element that is not an object.
#[derive(Debug, Clone)]
pub struct Document {
    records: Vec<Map<String, Value>>,
}

impl Document {
    /// Read and parse the input file.
    ///
    /// An unreadable file or invalid JSON surfaces as
    /// [`IngestError::MalformedInput`] before any table is touched.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|err| IngestError::MalformedInput {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        let value: Value =
            serde_json::from_str(&text).map_err(|err| IngestError::MalformedInput {
                path: path.to_path_buf(),
                message: err.to_string(),
            })?;
        let document = Self::from_value(value)?;
        debug!(
            path = %path.display(),
            records = document.len(),
            "input document loaded"
        );
        Ok(document)
    }

    /// Split an already-parsed value into records.
    pub fn from_value(value: Value) -> Result<Self> {
        let records = match value {
            Value::Object(record) => vec![record],
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(record) => Ok(record),
                    other => Err(IngestError::InvalidStructure(format!(
                        "expected an array of objects, found element {other}"
                    ))),
                })
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(IngestError::InvalidStructure(format!(
                    "expected an object or an array of objects, found {other}"
                )));
            }
        };
        Ok(Self { records })
    }

    /// The records, in input order.
    pub fn records(&self) -> &[Map<String, Value>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Union of [`collect_keys`] across every record: the full key set the
    /// table is created with.
    pub fn key_set(&self) -> BTreeSet<String> {
        let mut keys = BTreeSet::new();
        for record in &self.records {
            for (name, value) in record {
                keys.insert(name.clone());
                keys::collect_keys_into(value, &mut keys);
            }
        }
        keys
    }
}
