//! Route-level tests for the remote surface: proxying, the sync lock,
//! certificate reload, and the auth gate.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use tokio::sync::Mutex;

use pacerd::auth::StaticAuthenticator;
use pacerd::reload::CertReloader;
use pacerd::{
    create_router, AppState, BackendCaller, BackendRequest, BackendResponse, ProxyError,
    RequestSerializer,
};

/// Scripted stand-in for the legacy engine.
struct ScriptedBackend {
    status: StatusCode,
    body: Vec<u8>,
    /// Artificial processing delay, applied to guarded paths only.
    delay: Option<Duration>,
    /// Error returned instead of a response, when set.
    error: Option<fn() -> ProxyError>,
    calls: AtomicUsize,
    paths: Mutex<Vec<String>>,
    identities: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedBackend {
    fn ok(body: &str) -> Self {
        Self::with_status(StatusCode::OK, body)
    }

    fn with_status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.as_bytes().to_vec(),
            delay: None,
            error: None,
            calls: AtomicUsize::new(0),
            paths: Mutex::new(Vec::new()),
            identities: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: fn() -> ProxyError) -> Self {
        let mut backend = Self::ok("");
        backend.error = Some(error);
        backend
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendCaller for ScriptedBackend {
    async fn call(&self, request: BackendRequest) -> Result<BackendResponse, ProxyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths.lock().await.push(request.path.clone());
        if let Some(identity) = &request.identity {
            self.identities
                .lock()
                .await
                .push((identity.user.clone(), identity.groups.clone()));
        }
        if let Some(delay) = self.delay {
            if pacerd::serializer::is_guarded(&request.path) {
                tokio::time::sleep(delay).await;
            }
        }
        if let Some(error) = self.error {
            return Err(error());
        }
        Ok(BackendResponse {
            status: self.status,
            body: self.body.clone(),
            content_type: Some("text/plain".to_string()),
        })
    }
}

#[derive(Default)]
struct CountingReloader {
    count: AtomicUsize,
}

impl CertReloader for CountingReloader {
    fn reload(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

fn make_state(
    backend: Arc<ScriptedBackend>,
    reloader: Arc<CountingReloader>,
) -> (AppState, RequestSerializer) {
    let auth = StaticAuthenticator::new();
    auth.register_user_with_groups("hacluster", "secret", vec!["haclient".to_string()]);
    let serializer = RequestSerializer::new();
    let state = AppState {
        backend,
        serializer: serializer.clone(),
        reloader,
        auth: Arc::new(auth),
    };
    (state, serializer)
}

fn test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("router should build")
}

// Scenario A: an unlocked POST to the guarded endpoint returns the proxied
// response.
#[tokio::test]
async fn set_sync_options_proxies_when_unlocked() {
    let backend = Arc::new(ScriptedBackend::ok("synced"));
    let (state, _serializer) = make_state(backend.clone(), Arc::default());
    let server = test_server(state);

    let response = server.post("/remote/set_sync_options").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "synced");
    assert_eq!(backend.call_count(), 1);
}

#[tokio::test]
async fn set_sync_options_get_is_proxied_too() {
    let backend = Arc::new(ScriptedBackend::ok("options"));
    let (state, _serializer) = make_state(backend.clone(), Arc::default());
    let server = test_server(state);

    let response = server.get("/remote/set_sync_options").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(backend.call_count(), 1);
}

// Scenario B: with the lock held externally the guarded request must not
// complete, and completes once the lock is released.
#[tokio::test]
async fn set_sync_options_waits_for_lock_release() {
    let backend = Arc::new(ScriptedBackend::ok("synced"));
    let (state, serializer) = make_state(backend.clone(), Arc::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let guard = serializer
        .acquire(&pacerd::RequestContext::new())
        .await
        .unwrap();

    let url = format!("http://{}/remote/set_sync_options", addr);
    let request = tokio::spawn(async move {
        reqwest::Client::new()
            .post(url)
            .send()
            .await
            .unwrap()
            .status()
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!request.is_finished(), "request completed while locked");
    assert_eq!(backend.call_count(), 0);

    drop(guard);
    let status = tokio::time::timeout(Duration::from_secs(2), request)
        .await
        .expect("request should complete after release")
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(backend.call_count(), 1);
}

// Ordering and isolation: a second guarded request waits for the first,
// an unguarded request does not.
#[tokio::test]
async fn guarded_requests_serialize_and_unguarded_pass() {
    let backend = Arc::new(ScriptedBackend {
        delay: Some(Duration::from_millis(300)),
        ..ScriptedBackend::ok("done")
    });
    let (state, _serializer) = make_state(backend.clone(), Arc::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, create_router(state)).await.unwrap();
    });

    let order = Arc::new(Mutex::new(Vec::new()));
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for (label, path) in [
        ("a", "/remote/set_sync_options"),
        ("b", "/remote/set_certs"),
        ("c", "/remote/status"),
    ] {
        let client = client.clone();
        let order = Arc::clone(&order);
        let url = format!("http://{}{}", addr, path);
        tasks.push(tokio::spawn(async move {
            let status = client.post(url).send().await.unwrap().status();
            order.lock().await.push(label);
            status
        }));
        // Fix arrival order.
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    for task in tasks {
        let status = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    // The unguarded request finishes while the first guarded one still
    // holds the lock; the second guarded request finishes last.
    assert_eq!(*order.lock().await, vec!["c", "a", "b"]);
}

// Scenario C: certificate replacement success triggers exactly one reload;
// failure triggers none.
#[tokio::test]
async fn set_certs_success_reloads_once() {
    let backend = Arc::new(ScriptedBackend::ok("success"));
    let reloader = Arc::new(CountingReloader::default());
    let (state, _serializer) = make_state(backend, reloader.clone());
    let server = test_server(state);

    let response = server.post("/remote/set_certs").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "success");
    assert_eq!(reloader.count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn set_certs_failure_never_reloads() {
    let backend = Arc::new(ScriptedBackend::with_status(
        StatusCode::BAD_REQUEST,
        "cannot save ssl certificate without ssl key",
    ));
    let reloader = Arc::new(CountingReloader::default());
    let (state, _serializer) = make_state(backend, reloader.clone());
    let server = test_server(state);

    let response = server.post("/remote/set_certs").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(reloader.count.load(Ordering::SeqCst), 0);
}

// Scenario D: invalid credentials answer with an empty body and nothing
// reaches the engine.
#[tokio::test]
async fn auth_refuses_unknown_user_without_forwarding() {
    let backend = Arc::new(ScriptedBackend::ok("authorized"));
    let (state, _serializer) = make_state(backend.clone(), Arc::default());
    let server = test_server(state);

    let response = server
        .post("/remote/auth")
        .json(&serde_json::json!({ "username": "intruder", "password": "guess" }))
        .await;
    assert_eq!(response.text(), "");
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn auth_forwards_valid_user() {
    let backend = Arc::new(ScriptedBackend::ok("authorized"));
    let (state, _serializer) = make_state(backend.clone(), Arc::default());
    let server = test_server(state);

    let response = server
        .post("/remote/auth")
        .json(&serde_json::json!({ "username": "hacluster", "password": "secret" }))
        .await;
    response.assert_status(StatusCode::OK);
    assert_eq!(response.text(), "authorized");
    assert_eq!(backend.call_count(), 1);
    // The forwarded identity carries the user's group memberships.
    assert_eq!(
        backend.identities.lock().await.as_slice(),
        [("hacluster".to_string(), vec!["haclient".to_string()])]
    );
}

// Unwired paths under the prefix are relayed verbatim, untouched by the
// lock.
#[tokio::test]
async fn passthrough_relays_other_remote_paths() {
    let backend = Arc::new(ScriptedBackend::ok("ok"));
    let (state, _serializer) = make_state(backend.clone(), Arc::default());
    let server = test_server(state);

    let response = server.get("/remote/cluster_status").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(backend.paths.lock().await.as_slice(), ["/remote/cluster_status"]);
}

#[tokio::test]
async fn passthrough_relays_bare_prefix() {
    let backend = Arc::new(ScriptedBackend::ok("ok"));
    let (state, _serializer) = make_state(backend.clone(), Arc::default());
    let server = test_server(state);

    let response = server.get("/remote").await;
    response.assert_status(StatusCode::OK);
    assert_eq!(backend.paths.lock().await.as_slice(), ["/remote"]);
}

#[tokio::test]
async fn backend_timeout_maps_to_gateway_timeout() {
    let backend = Arc::new(ScriptedBackend::failing(|| ProxyError::Timeout));
    let (state, _serializer) = make_state(backend, Arc::default());
    let server = test_server(state);

    let response = server.post("/remote/set_sync_options").await;
    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn backend_unavailable_maps_to_bad_gateway() {
    let backend = Arc::new(ScriptedBackend::failing(|| {
        ProxyError::Unavailable("connection refused".to_string())
    }));
    let (state, _serializer) = make_state(backend, Arc::default());
    let server = test_server(state);

    let response = server.get("/remote/status").await;
    response.assert_status(StatusCode::BAD_GATEWAY);
}
