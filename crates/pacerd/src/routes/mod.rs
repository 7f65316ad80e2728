//! HTTP route handlers under the `/remote` prefix.

pub mod auth;
pub mod certs;
pub mod passthrough;
pub mod sync;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::serializer::LockStateError;

pub(crate) fn lock_error_response(err: LockStateError) -> Response {
    // Programming error, not user input; surface as an internal failure.
    tracing::error!("{}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}
