//! Per-call library environment.
//!
//! A [`LibraryEnvironment`] is built by the front end's bridge for exactly
//! one command invocation, passed `&mut` into that command, and dropped when
//! the call ends. It is never shared between invocations.

use std::sync::Arc;
use std::time::Duration;

use crate::reports::{CommandResult, ReportBatch, ReportItem, ReportSink};
use crate::resource::{BoothModified, LiveStore, ResourceKind, ResourceSlot};

/// Accessor for the credential store (known cluster hosts and their tokens).
pub trait KnownHostsGetter: Send + Sync {
    /// Names of the hosts currently known to this node.
    fn known_hosts(&self) -> Vec<String>;
}

/// The environment a library command runs against.
///
/// Each resource is tracked as live or mocked. A resource is mocked iff an
/// override blob was supplied at construction; there is no way to change
/// that decision afterwards.
pub struct LibraryEnvironment {
    user: Option<String>,
    groups: Vec<String>,
    sink: Arc<dyn ReportSink>,
    store: Arc<dyn LiveStore>,
    cib: ResourceSlot,
    corosync_conf: ResourceSlot,
    booth: ResourceSlot,
    booth_name: Option<String>,
    booth_key: Option<String>,
    known_hosts: Option<Arc<dyn KnownHostsGetter>>,
    request_timeout: Duration,
}

impl LibraryEnvironment {
    /// Create an environment with every resource live.
    pub fn new(
        sink: Arc<dyn ReportSink>,
        store: Arc<dyn LiveStore>,
        user: Option<String>,
        groups: Vec<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            user,
            groups,
            sink,
            store,
            cib: ResourceSlot::Live,
            corosync_conf: ResourceSlot::Live,
            booth: ResourceSlot::Live,
            booth_name: None,
            booth_key: None,
            known_hosts: None,
            request_timeout,
        }
    }

    /// Supply a CIB override, turning the resource mocked.
    pub fn mock_cib(mut self, data: String) -> Self {
        self.cib = ResourceSlot::Mocked { data };
        self
    }

    /// Supply a transport-configuration override, turning the resource mocked.
    pub fn mock_corosync_conf(mut self, data: String) -> Self {
        self.corosync_conf = ResourceSlot::Mocked { data };
        self
    }

    /// Supply a ticket-manager override, turning the resource mocked.
    pub fn mock_booth(mut self, name: String, config: String, key: String) -> Self {
        self.booth = ResourceSlot::Mocked { data: config };
        self.booth_name = Some(name);
        self.booth_key = Some(key);
        self
    }

    /// Name of the booth instance under an override, `None` when live.
    pub fn booth_name(&self) -> Option<&str> {
        self.booth_name.as_deref()
    }

    /// Attach a credential-store accessor.
    pub fn with_known_hosts(mut self, getter: Arc<dyn KnownHostsGetter>) -> Self {
        self.known_hosts = Some(getter);
        self
    }

    /// Caller identity, if authenticated.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Caller group memberships.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Timeout for outbound node requests made on behalf of this call.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Known hosts from the credential store, empty when no accessor is set.
    pub fn known_hosts(&self) -> Vec<String> {
        self.known_hosts
            .as_ref()
            .map(|g| g.known_hosts())
            .unwrap_or_default()
    }

    /// Emit a non-fatal report.
    pub fn report(&self, item: ReportItem) {
        self.sink.report(&item);
    }

    fn slot(&self, kind: ResourceKind) -> &ResourceSlot {
        match kind {
            ResourceKind::Cib => &self.cib,
            ResourceKind::CorosyncConf => &self.corosync_conf,
            ResourceKind::Booth => &self.booth,
        }
    }

    fn slot_mut(&mut self, kind: ResourceKind) -> &mut ResourceSlot {
        match kind {
            ResourceKind::Cib => &mut self.cib,
            ResourceKind::CorosyncConf => &mut self.corosync_conf,
            ResourceKind::Booth => &mut self.booth,
        }
    }

    /// Whether a resource goes through the live accessor.
    pub fn is_live(&self, kind: ResourceKind) -> bool {
        self.slot(kind).is_live()
    }

    /// Read a resource, mocked content or live accessor.
    pub fn read_resource(&self, kind: ResourceKind) -> CommandResult<String> {
        match self.slot(kind) {
            ResourceSlot::Mocked { data } => Ok(data.clone()),
            ResourceSlot::Live => self.store.read(kind).map_err(|e| {
                ReportBatch::single(ReportItem::error(
                    "RESOURCE_READ_FAILED",
                    format!("unable to read {}: {}", kind.as_str(), e),
                ))
            }),
        }
    }

    /// Write a resource. Mocked writes update only the in-memory blob; live
    /// writes are forwarded immediately through the accessor.
    pub fn write_resource(&mut self, kind: ResourceKind, content: String) -> CommandResult<()> {
        match self.slot_mut(kind) {
            ResourceSlot::Mocked { data } => {
                *data = content;
                Ok(())
            }
            ResourceSlot::Live => self.store.write(kind, &content).map_err(|e| {
                ReportBatch::single(ReportItem::error(
                    "RESOURCE_WRITE_FAILED",
                    format!("unable to write {}: {}", kind.as_str(), e),
                ))
            }),
        }
    }

    /// Final content of a mocked resource, `None` when the resource is live.
    pub fn final_mocked_content(&self, kind: ResourceKind) -> Option<String> {
        match self.slot(kind) {
            ResourceSlot::Mocked { data } => Some(data.clone()),
            ResourceSlot::Live => None,
        }
    }

    /// The ticket-manager auxiliary export, `None` when booth is live.
    pub fn export_booth_modified(&self) -> Option<BoothModified> {
        match &self.booth {
            ResourceSlot::Mocked { data } => Some(BoothModified {
                config: data.clone(),
                key: self.booth_key.clone().unwrap_or_default(),
            }),
            ResourceSlot::Live => None,
        }
    }
}
