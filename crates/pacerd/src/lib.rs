//! Pacer administration daemon.
//!
//! Serves the `/remote` HTTP surface, serializes requests that mutate
//! cluster sync configuration, and proxies authorized requests to the
//! co-located legacy engine over a loopback transport.

pub mod auth;
pub mod config;
pub mod proxy;
pub mod reload;
pub mod routes;
pub mod serializer;

pub use config::{Args, DaemonConfig};
pub use proxy::{BackendCaller, BackendRequest, BackendResponse, HttpBackend, ProxyError};
pub use serializer::{LockStateError, RequestContext, RequestSerializer};

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::Authenticator;
use crate::reload::CertReloader;

/// Application state shared across all routes.
#[derive(Clone)]
pub struct AppState {
    /// Transport to the legacy engine.
    pub backend: Arc<dyn BackendCaller>,
    /// Sync-configuration lock, one per process.
    pub serializer: RequestSerializer,
    /// TLS reload hook for certificate replacement.
    pub reloader: Arc<dyn CertReloader>,
    /// Credential validator for the auth route.
    pub auth: Arc<dyn Authenticator>,
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::auth::routes())
        .merge(routes::sync::routes())
        .merge(routes::certs::routes())
        .merge(routes::passthrough::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
