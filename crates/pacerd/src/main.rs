//! Pacer administration daemon binary.

use std::sync::Arc;

use clap::Parser;
use pacerd::auth::StaticAuthenticator;
use pacerd::reload::TlsMaterialReloader;
use pacerd::{create_router, AppState, Args, DaemonConfig, HttpBackend, RequestSerializer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = DaemonConfig::from(&args);

    info!(
        listen = %config.listen_addr,
        backend = %config.backend_addr,
        backend_timeout_ms = config.backend_timeout.as_millis(),
        "Starting pacer daemon"
    );

    let backend = HttpBackend::new(config.backend_addr.clone(), config.backend_timeout)?;
    let auth = StaticAuthenticator::from_default_env();
    if auth.user_count() == 0 {
        tracing::warn!("no users configured, every login will be refused");
    }

    let state = AppState {
        backend: Arc::new(backend),
        serializer: RequestSerializer::new(),
        reloader: Arc::new(TlsMaterialReloader::new(
            config.cert_path.clone(),
            config.key_path.clone(),
        )),
        auth: Arc::new(auth),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Daemon listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
