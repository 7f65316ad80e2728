//! Daemon configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Pacer administration daemon command line arguments.
#[derive(Debug, Parser)]
#[command(name = "pacerd")]
#[command(about = "Administration daemon for pacer")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "127.0.0.1:2224")]
    pub listen: String,

    /// Loopback address of the legacy engine.
    #[arg(short, long, default_value = "http://127.0.0.1:2225")]
    pub backend: String,

    /// Timeout (ms) for requests to the legacy engine.
    #[arg(long, default_value_t = 30_000)]
    pub backend_timeout_ms: u64,

    /// Path to the daemon TLS certificate.
    #[arg(long, default_value = "/var/lib/pacer/daemon.crt")]
    pub cert_path: PathBuf,

    /// Path to the daemon TLS key.
    #[arg(long, default_value = "/var/lib/pacer/daemon.key")]
    pub key_path: PathBuf,
}

/// Daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Loopback address of the legacy engine.
    pub backend_addr: String,
    /// Timeout for requests to the legacy engine.
    pub backend_timeout: Duration,
    /// Path to the daemon TLS certificate.
    pub cert_path: PathBuf,
    /// Path to the daemon TLS key.
    pub key_path: PathBuf,
}

impl From<&Args> for DaemonConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            backend_addr: args.backend.clone(),
            backend_timeout: Duration::from_millis(args.backend_timeout_ms),
            cert_path: args.cert_path.clone(),
            key_path: args.key_path.clone(),
        }
    }
}
