//! Error types for the document server.

use onedoc_protocol::ProtocolError;
use onedoc_store::StoreError;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving a request.
///
/// Every variant maps to a stable alphanumeric code that prefixes the
/// client-visible message, so a returned error can be correlated with
/// server logs without shipping internals to the client.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The request could not be decoded into its typed form.
    #[error("invalid request: {0}")]
    Decode(String),

    /// An observer hook aborted the request.
    #[error("request rejected by observer: {0}")]
    Hook(String),

    /// The document store failed on the primary path.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The request exceeded its time bound.
    #[error("request timed out")]
    Timeout,

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Returns the stable code for this error class.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Decode(_) => "ODC0101",
            ServerError::Hook(_) => "ODC0203",
            ServerError::Store(_) => "ODC0305",
            ServerError::Timeout => "ODC0407",
            ServerError::Internal(_) => "ODC0500",
        }
    }

    /// Renders the coded message sent to clients.
    #[must_use]
    pub fn to_client_string(&self) -> String {
        format!("{} {}", self.code(), self)
    }

    /// Returns true when the caller, not the server, is at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::Decode(_) | ServerError::Hook(_))
    }
}

impl From<ProtocolError> for ServerError {
    fn from(err: ProtocolError) -> Self {
        ServerError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable_and_distinct() {
        let errors = [
            ServerError::Decode("x".into()),
            ServerError::Hook("x".into()),
            ServerError::Timeout,
            ServerError::Internal("x".into()),
        ];
        let codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        let mut deduped = codes.clone();
        deduped.dedup();
        assert_eq!(codes, deduped);
    }

    #[test]
    fn client_string_is_code_prefixed() {
        let err = ServerError::Decode("missing field `params`".into());
        let message = err.to_client_string();
        assert!(message.starts_with("ODC0101 "));
        assert!(message.contains("params"));
    }

    #[test]
    fn error_classification() {
        assert!(ServerError::Decode("x".into()).is_client_error());
        assert!(ServerError::Hook("x".into()).is_client_error());
        assert!(!ServerError::Timeout.is_client_error());
        assert!(!ServerError::Internal("x".into()).is_client_error());
    }

    #[test]
    fn protocol_errors_become_decode_errors() {
        let err: ServerError = ProtocolError::InvalidBody("bad".into()).into();
        assert!(matches!(err, ServerError::Decode(_)));
    }
}
