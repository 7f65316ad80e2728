//! Certificate replacement endpoint.
//!
//! Guarded like the sync-options endpoint. A success answer from the
//! legacy engine triggers a local TLS reload, exactly once, after the
//! response is obtained; a failure answer never does.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::proxy::BackendRequest;
use crate::routes::lock_error_response;
use crate::serializer::RequestContext;
use crate::AppState;

/// Path of the set-certificates endpoint.
pub const PATH: &str = "/remote/set_certs";

/// Certificate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(PATH, post(handle))
}

async fn handle(State(state): State<AppState>, body: Bytes) -> Response {
    let ctx = RequestContext::new();
    let _guard = match state.serializer.acquire(&ctx).await {
        Ok(guard) => guard,
        Err(err) => return lock_error_response(err),
    };

    let mut request = BackendRequest::new(Method::POST, PATH);
    request.body = body.to_vec();

    match state.backend.call(request).await {
        Ok(response) => {
            if response.is_success() {
                // Best-effort: the response below is already determined.
                state.reloader.reload();
            }
            response.into_response()
        }
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::is_guarded;

    #[test]
    fn test_path_is_declared_guarded() {
        assert!(is_guarded(PATH));
    }
}
