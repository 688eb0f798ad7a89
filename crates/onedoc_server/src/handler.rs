//! Request handlers for the fetch and save operations.

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::hooks::RequestObserver;
use crate::resolver::{resolve, ArchiveSource, PriorState, SaveAttempt};
use chrono::Utc;
use onedoc_protocol::{
    now_ts, DocVersion, FetchRequest, FetchResponse, SaveRequest, SaveResponse, StoredFile,
    EPOCH_TS,
};
use onedoc_store::DocumentStore;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{info, warn};

/// Context shared by all request handling.
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// The document store.
    pub store: DocumentStore,
    /// External collaborator hooks.
    observer: Box<dyn RequestObserver>,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl HandlerContext {
    /// Creates a new handler context.
    pub fn new(
        config: ServerConfig,
        store: DocumentStore,
        observer: Box<dyn RequestObserver>,
    ) -> Self {
        Self {
            config,
            store,
            observer,
            write_lock: Mutex::new(()),
        }
    }
}

/// Handler for document requests.
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a new request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Handles a fetch request.
    ///
    /// Reads the store (bootstrapping an empty document when none
    /// exists), runs the fetch observer, and projects out the body for
    /// version-only requests.
    pub fn handle_fetch(&self, request: FetchRequest) -> ServerResult<FetchResponse> {
        let ctx = &self.context;
        // Fetch may bootstrap-write, so it takes the same lock as save.
        let _guard = ctx.write_lock.lock();

        let (stored, _created) = ctx.store.load_or_init()?;

        ctx.observer
            .on_fetch(&stored.data, &stored.data_version)
            .map_err(ServerError::Hook)?;

        Ok(if request.version_only {
            FetchResponse::version_only(stored.data_version)
        } else {
            FetchResponse::full(stored.data, stored.data_version)
        })
    }

    /// Handles a save request.
    ///
    /// Runs, in order: read of the prior state, the save observer
    /// (failure aborts before any write), best-effort backup of aged
    /// prior content, conflict resolution, best-effort conflict
    /// archiving, and the conditional commit.
    pub fn handle_save(&self, request: SaveRequest) -> ServerResult<SaveResponse> {
        let ctx = &self.context;
        let _guard = ctx.write_lock.lock();

        let prior = ctx.store.read()?;
        let current_version = prior
            .as_ref()
            .map(|p| p.stored.data_version.clone())
            .unwrap_or_else(DocVersion::generate);

        ctx.observer
            .on_save(
                &request.data,
                &current_version,
                request.prev_data_version.as_ref(),
                &request.new_data_version,
            )
            .map_err(ServerError::Hook)?;

        // Snapshot aged prior content before it can be overwritten.
        if let Some(prior) = &prior {
            let prev_ts = prior.stored.data.ts().unwrap_or(EPOCH_TS);
            if ctx.config.backup_policy().should_backup(prev_ts, Utc::now()) {
                if let Err(e) = ctx
                    .store
                    .write_backup(&prior.raw, prev_ts, ctx.config.max_backups)
                {
                    warn!(error = %e, "backup write failed, continuing with save");
                }
            }
        }

        let mut data = request.data;
        data.ensure_ts(&now_ts());
        let new_ts = data.ts().unwrap_or(EPOCH_TS).to_string();

        let resolution = resolve(&SaveAttempt {
            prior: prior.as_ref().map(|p| PriorState {
                version: &p.stored.data_version,
                ts: p.stored.data.ts().unwrap_or(EPOCH_TS),
            }),
            claimed_prev: request.prev_data_version.as_ref(),
            new_version: &request.new_data_version,
            new_ts: &new_ts,
        });

        if let Some(outcome) = &resolution.conflict {
            info!(
                actual_prev = %outcome.record.actual_prev,
                new = %outcome.record.new,
                reverse = outcome.record.reverse_conflict,
                "version conflict detected"
            );
            data.push_conflict(&outcome.record);
        }

        let stored = StoredFile::new(data, request.new_data_version);

        if let (Some(outcome), Some(prior)) = (&resolution.conflict, &prior) {
            let content = match outcome.archive {
                ArchiveSource::Prior => prior.raw.clone(),
                ArchiveSource::Incoming => stored.to_json().map_err(onedoc_store::StoreError::from)?,
            };
            if let Err(e) = ctx
                .store
                .write_conflict(&prior.stored.data_version, &content)
            {
                warn!(error = %e, "conflict archive write failed, continuing with save");
            }
        }

        if resolution.commit {
            ctx.store.commit(&stored)?;
        }

        Ok(SaveResponse::success())
    }
}
