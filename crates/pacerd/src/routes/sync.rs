//! Sync-options endpoint, guarded by the request serializer.

use axum::body::Bytes;
use axum::extract::{RawQuery, State};
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::proxy::BackendRequest;
use crate::routes::lock_error_response;
use crate::serializer::RequestContext;
use crate::AppState;

/// Path of the sync-options endpoint.
pub const PATH: &str = "/remote/set_sync_options";

/// Sync-options routes. GET and POST are guarded identically.
pub fn routes() -> Router<AppState> {
    Router::new().route(PATH, get(handle).post(handle))
}

async fn handle(
    State(state): State<AppState>,
    method: Method,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Response {
    let ctx = RequestContext::new();
    let _guard = match state.serializer.acquire(&ctx).await {
        Ok(guard) => guard,
        Err(err) => return lock_error_response(err),
    };

    let mut request = BackendRequest::new(method, PATH);
    request.query = query;
    request.body = body.to_vec();

    // The guard is held across the proxied call and released on every exit
    // path when this scope ends.
    match state.backend.call(request).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    }
}
