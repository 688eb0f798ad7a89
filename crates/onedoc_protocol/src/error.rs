//! Error types for protocol decoding.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while decoding or encoding protocol data.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// A request body could not be decoded into its typed form.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_detail() {
        let err = ProtocolError::InvalidBody("missing field `params`".into());
        assert!(err.to_string().contains("params"));
    }
}
