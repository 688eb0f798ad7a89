//! # onedoc Server
//!
//! Fetch/save handlers, version-conflict resolution, and the HTTP shell
//! for the onedoc sync service.
//!
//! This crate provides:
//! - `GET /api/one` — fetch the document (or only its version)
//! - `POST /api/one` — save with optimistic concurrency control
//! - Conflict archiving: the losing side of every version conflict is
//!   preserved on disk, never discarded
//! - Periodic, retention-capped backup snapshots of the store file
//!
//! # Protocol
//!
//! Saves carry the version the caller last saw (`prevDataVersion`) and
//! a caller-generated token for the new state (`newDataVersion`). When
//! the claimed previous version is no longer current, the resolver
//! compares timestamps: the newer document wins the live store, the
//! older one is archived under the superseded version, and a conflict
//! record is appended to the saved document either way. Reverse
//! conflicts (the incoming write is the stale one) still answer
//! `{ok:true}` — last-writer-wins by timestamp, not by arrival order.
//!
//! # Errors
//!
//! Both endpoints always answer HTTP 200; failures ride in the body as
//! `{ok:false, error:"<CODE> <detail>"}` with a stable code per error
//! class for log correlation.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod config;
mod error;
mod handler;
mod hooks;
mod http;
mod resolver;
mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{HandlerContext, RequestHandler};
pub use hooks::{NoopObserver, RequestObserver};
pub use http::routes;
pub use resolver::{resolve, ArchiveSource, ConflictOutcome, PriorState, Resolution, SaveAttempt};
pub use server::DocServer;
