//! The document server facade.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{HandlerContext, RequestHandler};
use crate::hooks::{NoopObserver, RequestObserver};
use crate::http::routes;
use onedoc_protocol::{FetchRequest, FetchResponse, SaveRequest, SaveResponse};
use onedoc_store::DocumentStore;
use std::sync::Arc;
use tracing::info;

/// The document server.
///
/// Owns the store (and its directory lock) and the request handler.
/// Use [`DocServer::serve`] to run the HTTP endpoints, or call the
/// handlers directly when embedding the server in another transport.
///
/// # Example
///
/// ```no_run
/// use onedoc_server::{DocServer, ServerConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let server = DocServer::new(ServerConfig::default())?;
/// // server.serve().await runs GET/POST /api/one
/// # Ok(())
/// # }
/// ```
pub struct DocServer {
    handler: Arc<RequestHandler>,
}

impl DocServer {
    /// Creates a server with no observer hooks.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        Self::with_observer(config, Box::new(NoopObserver))
    }

    /// Creates a server with the given observer hooks.
    pub fn with_observer(
        config: ServerConfig,
        observer: Box<dyn RequestObserver>,
    ) -> ServerResult<Self> {
        let store = DocumentStore::open(&config.data_dir)?;
        let context = Arc::new(HandlerContext::new(config, store, observer));
        let handler = Arc::new(RequestHandler::new(context));
        Ok(Self { handler })
    }

    /// Returns a handle to the request handler.
    #[must_use]
    pub fn handler(&self) -> Arc<RequestHandler> {
        Arc::clone(&self.handler)
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        self.handler.config()
    }

    /// Handles a fetch request directly.
    pub fn handle_fetch(&self, request: FetchRequest) -> ServerResult<FetchResponse> {
        self.handler.handle_fetch(request)
    }

    /// Handles a save request directly.
    pub fn handle_save(&self, request: SaveRequest) -> ServerResult<SaveResponse> {
        self.handler.handle_save(request)
    }

    /// Serves the HTTP endpoints until the process exits.
    pub async fn serve(self) {
        let addr = self.handler.config().bind_addr;
        info!(%addr, "serving document API at /api/one");
        warp::serve(routes(self.handler)).run(addr).await;
    }
}
