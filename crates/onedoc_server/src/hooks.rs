//! Observer hooks for external collaborators.

use onedoc_protocol::{DocVersion, Document};

/// External collaborator notified around each request.
///
/// Implement this trait to attach side-effecting instrumentation
/// (audit trails, cache invalidation, notifications) to the fetch and
/// save paths. Returning an error aborts the request with a coded
/// failure response: for saves this happens before any write to the
/// primary store.
pub trait RequestObserver: Send + Sync {
    /// Called with the current document and version before a fetch
    /// response is produced.
    fn on_fetch(&self, _document: &Document, _current: &DocVersion) -> Result<(), String> {
        Ok(())
    }

    /// Called with the incoming document and the full version picture
    /// before a save takes effect.
    fn on_save(
        &self,
        _document: &Document,
        _current: &DocVersion,
        _prev: Option<&DocVersion>,
        _new: &DocVersion,
    ) -> Result<(), String> {
        Ok(())
    }
}

/// An observer that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}
