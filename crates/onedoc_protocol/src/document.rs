//! The document payload and its protocol-managed fields.

use crate::version::DocVersion;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field holding the document's last-write timestamp.
pub const TS_FIELD: &str = "ts";

/// Field holding the append-only conflict log.
pub const CONFLICTS_FIELD: &str = "versionConflicts";

/// Sentinel timestamp assigned to documents that carry none.
///
/// Sorts before any real write timestamp, so a sentinel-stamped document
/// always loses a reverse-conflict comparison.
pub const EPOCH_TS: &str = "2000-01-01 00:00:00";

/// The synchronized document: an opaque JSON object.
///
/// The protocol manages exactly two fields — [`TS_FIELD`] and
/// [`CONFLICTS_FIELD`] — and passes everything else through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wraps an existing JSON object.
    #[must_use]
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Returns true when the document has no fields at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a field value, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Returns the document timestamp, if present and a string.
    #[must_use]
    pub fn ts(&self) -> Option<&str> {
        self.0.get(TS_FIELD).and_then(Value::as_str)
    }

    /// Sets the document timestamp.
    pub fn set_ts(&mut self, ts: impl Into<String>) {
        self.0.insert(TS_FIELD.to_string(), Value::String(ts.into()));
    }

    /// Defaults the timestamp when missing or non-string.
    ///
    /// Returns true when the default was applied.
    pub fn ensure_ts(&mut self, default: &str) -> bool {
        if self.ts().is_some() {
            return false;
        }
        self.set_ts(default);
        true
    }

    /// Appends a record to the conflict log, creating the log if needed.
    ///
    /// The log is append-only: existing entries are never touched.
    pub fn push_conflict(&mut self, record: &ConflictRecord) {
        let entry = record.to_value();
        match self.0.get_mut(CONFLICTS_FIELD) {
            Some(Value::Array(log)) => log.push(entry),
            _ => {
                self.0
                    .insert(CONFLICTS_FIELD.to_string(), Value::Array(vec![entry]));
            }
        }
    }

    /// Returns the decoded conflict log. Malformed entries are skipped.
    #[must_use]
    pub fn conflicts(&self) -> Vec<ConflictRecord> {
        self.0
            .get(CONFLICTS_FIELD)
            .and_then(Value::as_array)
            .map(|log| {
                log.iter()
                    .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// One entry in the document's append-only conflict log.
///
/// Recorded whenever a save's claimed previous version does not match
/// the store's actual current version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    /// The version that was actually current when the save arrived.
    pub actual_prev: DocVersion,
    /// The version the caller believed was current, if it sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_prev: Option<DocVersion>,
    /// The version the save carried.
    pub new: DocVersion,
    /// True when the incoming write was timestamp-older-or-equal to the
    /// stored document and therefore archived without being applied.
    pub reverse_conflict: bool,
}

impl ConflictRecord {
    /// Renders the record as a JSON value for the conflict log.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert(
            "actualPrev".to_string(),
            Value::String(self.actual_prev.to_string()),
        );
        if let Some(expected) = &self.expected_prev {
            map.insert("expectedPrev".to_string(), Value::String(expected.to_string()));
        }
        map.insert("new".to_string(), Value::String(self.new.to_string()));
        map.insert(
            "reverseConflict".to_string(),
            Value::Bool(self.reverse_conflict),
        );
        Value::Object(map)
    }
}
