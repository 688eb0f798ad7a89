//! Opaque document version tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// An opaque token identifying one committed state of the document.
///
/// Tokens are compared for equality only; they carry no ordering. The
/// server generates a fresh token when no prior version exists, but
/// callers supply their own `newDataVersion` on save (offline clients
/// pre-stamp writes), so arbitrary token strings must round-trip
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocVersion(String);

impl DocVersion {
    /// Wraps an existing token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Generates a fresh random token.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the token with dashes stripped, for use in conflict
    /// archive file names.
    #[must_use]
    pub fn file_stem(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for DocVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocVersion {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for DocVersion {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn generated_tokens_are_unique() {
        let a = DocVersion::generate();
        let b = DocVersion::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn file_stem_strips_dashes() {
        let version = DocVersion::new("123e4567-e89b-12d3-a456-426614174000");
        assert_eq!(version.file_stem(), "123e4567e89b12d3a456426614174000");
    }

    #[test]
    fn serde_is_transparent() {
        let version = DocVersion::new("v1");
        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"v1\"");

        let back: DocVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, version);
    }

    proptest! {
        #[test]
        fn file_stem_never_contains_dashes(token in ".*") {
            let stem = DocVersion::new(token).file_stem();
            prop_assert!(!stem.contains('-'));
        }

        #[test]
        fn file_stem_is_idempotent(token in ".*") {
            let stem = DocVersion::new(token).file_stem();
            prop_assert_eq!(DocVersion::new(stem.clone()).file_stem(), stem);
        }
    }
}
