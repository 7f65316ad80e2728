//! Credential validation endpoint.
//!
//! Invalid credentials answer with an empty body and nothing reaches the
//! legacy engine. Valid credentials forward the original request body
//! downstream together with the authenticated identity.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use serde::Deserialize;

use crate::proxy::{BackendRequest, Identity};
use crate::AppState;

/// Path of the auth endpoint.
pub const PATH: &str = "/remote/auth";

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(PATH, post(handle))
}

#[derive(Debug, Deserialize)]
struct AuthPayload {
    username: String,
    password: String,
}

async fn handle(State(state): State<AppState>, body: Bytes) -> Response {
    let payload: AuthPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            return (StatusCode::BAD_REQUEST, format!("invalid payload: {}", err)).into_response()
        }
    };

    let groups = match state.auth.authenticate(&payload.username, &payload.password) {
        Some(groups) => groups,
        None => {
            tracing::info!(user = %payload.username, "authentication refused");
            // Empty body, nothing forwarded.
            return StatusCode::OK.into_response();
        }
    };

    let mut request = BackendRequest::new(Method::POST, PATH);
    request.body = body.to_vec();
    request.identity = Some(Identity {
        user: payload.username,
        groups,
    });

    match state.backend.call(request).await {
        Ok(response) => response.into_response(),
        Err(err) => err.into_response(),
    }
}
