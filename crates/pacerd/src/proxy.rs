//! Loopback proxy to the legacy engine.
//!
//! Forwards method, path, body, and authenticated identity, and relays the
//! engine's status and body verbatim. A downstream timeout surfaces as a
//! gateway-timeout outcome and a connection failure as bad-gateway; neither
//! is retried here.

use std::time::Duration;

use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Header carrying the authenticated user to the legacy engine.
pub const IDENTITY_USER_HEADER: &str = "x-pacer-user";
/// Header carrying the authenticated user's groups.
pub const IDENTITY_GROUPS_HEADER: &str = "x-pacer-groups";

/// Authenticated identity forwarded with a request.
#[derive(Debug, Clone)]
pub struct Identity {
    /// User name.
    pub user: String,
    /// Group memberships.
    pub groups: Vec<String>,
}

/// A request to forward to the legacy engine.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute path on the engine.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    /// Request body, passed through untouched.
    pub body: Vec<u8>,
    /// Authenticated identity, if the route established one.
    pub identity: Option<Identity>,
}

impl BackendRequest {
    /// Build a bodyless request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: Vec::new(),
            identity: None,
        }
    }
}

/// The engine's answer, relayed verbatim.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    /// HTTP status.
    pub status: StatusCode,
    /// Response body.
    pub body: Vec<u8>,
    /// Content type, when the engine set one.
    pub content_type: Option<String>,
}

impl BackendResponse {
    /// Whether the engine reported success.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

impl IntoResponse for BackendResponse {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self
            .content_type
            .and_then(|ct| HeaderValue::from_str(&ct).ok())
        {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// Failure talking to the legacy engine.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The engine did not answer within the configured timeout.
    #[error("legacy engine timed out")]
    Timeout,
    /// The engine could not be reached.
    #[error("legacy engine unavailable: {0}")]
    Unavailable(String),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        };
        tracing::warn!(status = %status, "backend proxy failed: {}", self);
        (status, self.to_string()).into_response()
    }
}

/// Forwards requests to the legacy engine.
#[async_trait]
pub trait BackendCaller: Send + Sync {
    /// Forward one request and relay the engine's response.
    async fn call(&self, request: BackendRequest) -> Result<BackendResponse, ProxyError>;
}

/// HTTP transport to the co-located engine.
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a transport with a bounded per-request timeout.
    ///
    /// `base_url` must point at the loopback address the engine listens on.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn url(&self, request: &BackendRequest) -> String {
        let base = self.base_url.trim_end_matches('/');
        match &request.query {
            Some(query) => format!("{}{}?{}", base, request.path, query),
            None => format!("{}{}", base, request.path),
        }
    }
}

#[async_trait]
impl BackendCaller for HttpBackend {
    async fn call(&self, request: BackendRequest) -> Result<BackendResponse, ProxyError> {
        let url = self.url(&request);
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .body(request.body);
        if let Some(identity) = &request.identity {
            builder = builder
                .header(IDENTITY_USER_HEADER, &identity.user)
                .header(IDENTITY_GROUPS_HEADER, identity.groups.join(","));
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout
            } else {
                ProxyError::Unavailable(e.to_string())
            }
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout
            } else {
                ProxyError::Unavailable(e.to_string())
            }
        })?;

        Ok(BackendResponse {
            status,
            body: body.to_vec(),
            content_type,
        })
    }
}
