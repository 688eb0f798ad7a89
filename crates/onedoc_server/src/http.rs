//! Warp HTTP shell.
//!
//! A thin transport layer: query parameters and body bytes are decoded
//! into the typed requests, the synchronous handler runs on the
//! blocking pool under a time bound, and the typed response is
//! serialized back. Both endpoints always answer HTTP 200 — failures
//! ride in the body as `{ok:false, error}` so clients branch on `ok`,
//! never on status codes.

use crate::error::{ServerError, ServerResult};
use crate::handler::RequestHandler;
use bytes::Bytes;
use onedoc_protocol::{ErrorResponse, FetchRequest, SaveEnvelope};
use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tracing::error;
use warp::{Filter, Rejection, Reply};

/// Builds the `/api/one` routes over the given handler.
pub fn routes(
    handler: Arc<RequestHandler>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let api_one = warp::path("api")
        .and(warp::path("one"))
        .and(warp::path::end());

    let fetch = api_one
        .clone()
        .and(warp::get())
        .and(warp::query::<HashMap<String, String>>())
        .and(with_handler(Arc::clone(&handler)))
        .and_then(fetch_route);

    let save = api_one
        .and(warp::post())
        .and(warp::body::bytes())
        .and(with_handler(handler))
        .and_then(save_route);

    fetch.or(save)
}

fn with_handler(
    handler: Arc<RequestHandler>,
) -> impl Filter<Extract = (Arc<RequestHandler>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&handler))
}

async fn fetch_route(
    query: HashMap<String, String>,
    handler: Arc<RequestHandler>,
) -> Result<impl Reply, Rejection> {
    let request = FetchRequest::from_query(&query);
    let timeout = handler.config().request_timeout;
    let result = run_bounded(timeout, move || handler.handle_fetch(request)).await;
    Ok(reply_json(result))
}

async fn save_route(
    body: Bytes,
    handler: Arc<RequestHandler>,
) -> Result<impl Reply, Rejection> {
    let timeout = handler.config().request_timeout;
    let result = match SaveEnvelope::decode(&body) {
        Ok(request) => run_bounded(timeout, move || handler.handle_save(request)).await,
        Err(e) => Err(ServerError::from(e)),
    };
    Ok(reply_json(result))
}

/// Runs a blocking handler call under the request time bound.
async fn run_bounded<T, F>(timeout: Duration, task: F) -> ServerResult<T>
where
    F: FnOnce() -> ServerResult<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(task)).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(ServerError::Internal(join_err.to_string())),
        Err(_) => Err(ServerError::Timeout),
    }
}

fn reply_json<T: Serialize>(result: ServerResult<T>) -> warp::reply::Json {
    match result {
        Ok(response) => warp::reply::json(&response),
        Err(err) => {
            error!(code = err.code(), error = %err, "request failed");
            warp::reply::json(&ErrorResponse::new(err.to_client_string()))
        }
    }
}
