//! Mutable per-invocation front-end environment.

use std::sync::Arc;
use std::time::Duration;

use pacer_lib::env::KnownHostsGetter;
use pacer_lib::reports::ReportSink;
use pacer_lib::resource::{BoothModified, LiveStore};

/// Ticket-manager override supplied on the command line.
#[derive(Debug, Clone)]
pub struct BoothOverride {
    /// Booth instance name.
    pub name: String,
    /// Configuration blob.
    pub config_data: String,
    /// Key blob.
    pub key_data: String,
    /// Auxiliary view exported after a successful call. Filled through a
    /// path separate from the general mocked-resource reflection; see
    /// [`crate::bridge::export_ticket_manager_modified`].
    pub modified: Option<BoothModified>,
}

/// One mutable instance per invocation. A present blob is an override (the
/// resource runs mocked); an absent one means the live accessor is used.
pub struct FrontEndEnvironment {
    /// Where reports are presented.
    pub sink: Arc<dyn ReportSink>,
    /// Caller identity.
    pub user: Option<String>,
    /// Caller group memberships.
    pub groups: Vec<String>,
    /// Cluster information base override.
    pub cib_data: Option<String>,
    /// Transport configuration override.
    pub corosync_conf_data: Option<String>,
    /// Ticket-manager override.
    pub booth: Option<BoothOverride>,
    /// Credential-store accessor.
    pub known_hosts: Option<Arc<dyn KnownHostsGetter>>,
    /// Accessor for live resources.
    pub store: Arc<dyn LiveStore>,
    /// Timeout for outbound node requests.
    pub request_timeout: Duration,
}

impl FrontEndEnvironment {
    /// Create an environment with no overrides; every resource is live.
    pub fn new(sink: Arc<dyn ReportSink>, store: Arc<dyn LiveStore>) -> Self {
        Self {
            sink,
            user: None,
            groups: Vec::new(),
            cib_data: None,
            corosync_conf_data: None,
            booth: None,
            known_hosts: None,
            store,
            request_timeout: Duration::from_secs(60),
        }
    }
}
