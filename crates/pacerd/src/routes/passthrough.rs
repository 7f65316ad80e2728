//! Verbatim pass-through for the rest of the remote surface.
//!
//! Everything under the prefix that is not an explicitly wired endpoint is
//! relayed to the legacy engine without touching the sync lock, so guarded
//! requests in flight never delay unrelated traffic.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;

use crate::proxy::BackendRequest;
use crate::AppState;

/// Pass-through routes. Explicit routes take precedence over the wildcard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/remote", any(handle))
        .route("/remote/", any(handle))
        .route("/remote/*rest", any(handle))
}

async fn handle(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let mut request = BackendRequest::new(method, uri.path());
    request.query = uri.query().map(str::to_string);
    request.body = body.to_vec();

    match state.backend.call(request).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    }
}
