//! # onedoc Protocol
//!
//! Document model and wire contracts for the onedoc sync service.
//!
//! This crate defines:
//! - The [`Document`] payload and its protocol-managed fields (`ts`,
//!   `versionConflicts`)
//! - Opaque [`DocVersion`] tokens identifying committed document states
//! - The on-disk [`StoredFile`] shape
//! - Typed fetch/save requests and responses
//!
//! Everything here is plain data: no file system access, no HTTP. The
//! store and server crates own all side effects.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod error;
mod messages;
mod stored;
mod timestamp;
mod version;

pub use document::{ConflictRecord, Document, CONFLICTS_FIELD, EPOCH_TS, TS_FIELD};
pub use error::{ProtocolError, ProtocolResult};
pub use messages::{
    ErrorResponse, FetchRequest, FetchResponse, SaveEnvelope, SaveRequest, SaveResponse,
    VERSION_ONLY_PARAM,
};
pub use stored::StoredFile;
pub use timestamp::{now_ts, parse_ts, ts_order};
pub use version::DocVersion;
