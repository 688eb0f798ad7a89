//! The on-disk representation of the document store.

use crate::document::{Document, EPOCH_TS};
use crate::error::ProtocolResult;
use crate::version::DocVersion;
use serde::{Deserialize, Serialize};

/// The serialized shape of the primary store file.
///
/// Invariant: a parsed-and-normalized `StoredFile` always carries both a
/// version (synthesized when the file lacks one) and a document
/// timestamp (defaulted to [`EPOCH_TS`] when missing). The timestamp
/// default is applied in memory on every read, never persisted by
/// itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    /// The document payload.
    pub data: Document,
    /// The version token of this committed state.
    #[serde(rename = "dataVersion")]
    pub data_version: DocVersion,
}

/// Lenient mirror of [`StoredFile`] used for first-stage parsing, where
/// either field may be absent.
#[derive(Debug, Deserialize)]
struct RawStored {
    data: Option<Document>,
    #[serde(rename = "dataVersion")]
    data_version: Option<DocVersion>,
}

impl StoredFile {
    /// Creates a stored file from parts.
    #[must_use]
    pub fn new(data: Document, data_version: DocVersion) -> Self {
        Self { data, data_version }
    }

    /// Creates an empty store with a fresh version.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Document::new(), DocVersion::generate())
    }

    /// Parses raw store bytes, tolerating missing fields.
    ///
    /// Returns `None` when the content is not JSON or carries no `data`
    /// object — both are treated as "no prior state" by the store. A
    /// missing `dataVersion` is synthesized; the boolean reports whether
    /// that happened so the caller can persist the repair.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Option<(Self, bool)> {
        let parsed: RawStored = serde_json::from_str(raw).ok()?;
        let data = parsed.data?;
        let (data_version, synthesized) = match parsed.data_version {
            Some(version) => (version, false),
            None => (DocVersion::generate(), true),
        };
        Some((Self { data, data_version }.normalized(), synthesized))
    }

    /// Applies read-time normalization: defaults a missing timestamp.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.data.ensure_ts(EPOCH_TS);
        self
    }

    /// Serializes to the canonical on-disk encoding.
    pub fn to_json(&self) -> ProtocolResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
