//! Typed fetch/save requests and responses.

use crate::document::Document;
use crate::error::{ProtocolError, ProtocolResult};
use crate::version::DocVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Query parameter selecting the version-only fetch projection.
pub const VERSION_ONLY_PARAM: &str = "dataVersionOnly";

/// A fetch request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchRequest {
    /// When true, the response omits the document body and carries only
    /// the current version.
    pub version_only: bool,
}

impl FetchRequest {
    /// Builds a request asking for the full document.
    #[must_use]
    pub fn full() -> Self {
        Self {
            version_only: false,
        }
    }

    /// Builds a request asking only for the current version.
    #[must_use]
    pub fn version_only() -> Self {
        Self { version_only: true }
    }

    /// Parses the request from HTTP query parameters.
    ///
    /// `dataVersionOnly` values `"1"` and `"true"` select the
    /// projection; anything else, including absence, selects the full
    /// fetch.
    #[must_use]
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let flag = query
            .get(VERSION_ONLY_PARAM)
            .is_some_and(|value| value == "1" || value == "true");
        Self { version_only: flag }
    }
}

/// A successful fetch response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Always true; failures use [`ErrorResponse`].
    pub ok: bool,
    /// The document body; omitted for version-only fetches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Document>,
    /// The current document version.
    #[serde(rename = "dataVersion")]
    pub data_version: DocVersion,
}

impl FetchResponse {
    /// Builds a full fetch response.
    #[must_use]
    pub fn full(data: Document, data_version: DocVersion) -> Self {
        Self {
            ok: true,
            data: Some(data),
            data_version,
        }
    }

    /// Builds a version-only fetch response.
    #[must_use]
    pub fn version_only(data_version: DocVersion) -> Self {
        Self {
            ok: true,
            data: None,
            data_version,
        }
    }
}

/// A save request.
///
/// `newDataVersion` is caller-supplied by design: offline-first clients
/// pre-commit a version token before the round trip, and the server
/// must never replace it with one of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    /// The new document body.
    pub data: Document,
    /// The version the caller last saw; absent on a genuinely first
    /// save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev_data_version: Option<DocVersion>,
    /// The version token for the state being saved.
    pub new_data_version: DocVersion,
}

/// The wire envelope around a save request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveEnvelope {
    /// The enclosed request.
    pub params: SaveRequest,
}

impl SaveEnvelope {
    /// Decodes a save request from raw HTTP body bytes.
    pub fn decode(bytes: &[u8]) -> ProtocolResult<SaveRequest> {
        let envelope: SaveEnvelope = serde_json::from_slice(bytes)
            .map_err(|e| ProtocolError::InvalidBody(e.to_string()))?;
        Ok(envelope.params)
    }
}

/// A save response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// True on success, including reverse-conflict soft success.
    pub ok: bool,
    /// Coded error detail on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    /// Builds a success response.
    #[must_use]
    pub fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    /// Builds a failure response.
    #[must_use]
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
        }
    }
}

/// The in-body error shape shared by both endpoints.
///
/// Errors ride in the body, not the HTTP status: both endpoints answer
/// 200 and clients branch on `ok`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always false.
    pub ok: bool,
    /// Coded error detail.
    pub error: String,
}

impl ErrorResponse {
    /// Builds an error response.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
