//! Mutable configuration resources and their external accessors.
//!
//! The blobs themselves are opaque to this layer. A resource is either
//! *live* (read and written through a [`LiveStore`], observable outside the
//! call immediately) or *mocked* (an in-memory override supplied by the
//! caller, never touching the live accessor).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

/// The configuration resources mediated by pacer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Cluster information base.
    Cib,
    /// Transport (membership/communication) configuration.
    CorosyncConf,
    /// Ticket-manager configuration.
    Booth,
}

impl ResourceKind {
    /// All resource kinds, in the order middleware processes them.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Cib,
        ResourceKind::CorosyncConf,
        ResourceKind::Booth,
    ];

    /// Stable name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Cib => "cib",
            ResourceKind::CorosyncConf => "corosync-conf",
            ResourceKind::Booth => "booth",
        }
    }
}

/// Errors from a live accessor.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The store has no location configured for this resource.
    #[error("no live accessor configured for {0}")]
    Unconfigured(&'static str),
}

/// External accessor for live resources.
///
/// Writes through a live store are observable outside the call before the
/// command returns.
pub trait LiveStore: Send + Sync {
    /// Read the current content of a resource.
    fn read(&self, kind: ResourceKind) -> Result<String, StoreError>;

    /// Replace the content of a resource.
    fn write(&self, kind: ResourceKind, data: &str) -> Result<(), StoreError>;
}

/// Filesystem-backed live store.
#[derive(Debug)]
pub struct FsStore {
    paths: HashMap<ResourceKind, PathBuf>,
}

impl FsStore {
    /// Create a store with one file per resource kind.
    pub fn new(cib: PathBuf, corosync_conf: PathBuf, booth: PathBuf) -> Self {
        let mut paths = HashMap::new();
        paths.insert(ResourceKind::Cib, cib);
        paths.insert(ResourceKind::CorosyncConf, corosync_conf);
        paths.insert(ResourceKind::Booth, booth);
        Self { paths }
    }

    fn path(&self, kind: ResourceKind) -> Result<&PathBuf, StoreError> {
        self.paths
            .get(&kind)
            .ok_or(StoreError::Unconfigured(kind.as_str()))
    }
}

impl LiveStore for FsStore {
    fn read(&self, kind: ResourceKind) -> Result<String, StoreError> {
        Ok(std::fs::read_to_string(self.path(kind)?)?)
    }

    fn write(&self, kind: ResourceKind, data: &str) -> Result<(), StoreError> {
        std::fs::write(self.path(kind)?, data)?;
        Ok(())
    }
}

/// In-memory live store, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemStore {
    cells: Mutex<HashMap<ResourceKind, String>>,
}

impl MemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a resource with initial content.
    pub fn seed(&self, kind: ResourceKind, data: impl Into<String>) {
        self.cells.lock().unwrap().insert(kind, data.into());
    }

    /// Snapshot the current content of a resource, if any.
    pub fn snapshot(&self, kind: ResourceKind) -> Option<String> {
        self.cells.lock().unwrap().get(&kind).cloned()
    }
}

impl LiveStore for MemStore {
    fn read(&self, kind: ResourceKind) -> Result<String, StoreError> {
        self.cells
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .ok_or(StoreError::Unconfigured(kind.as_str()))
    }

    fn write(&self, kind: ResourceKind, data: &str) -> Result<(), StoreError> {
        self.cells.lock().unwrap().insert(kind, data.to_string());
        Ok(())
    }
}

/// State of one resource within a library environment.
#[derive(Debug, Clone)]
pub enum ResourceSlot {
    /// Reads and writes go through the live accessor.
    Live,
    /// In-memory override; writes update only the blob.
    Mocked {
        /// Current content of the override.
        data: String,
    },
}

impl ResourceSlot {
    /// Whether this slot is live.
    pub fn is_live(&self) -> bool {
        matches!(self, ResourceSlot::Live)
    }
}

/// Auxiliary view of the ticket-manager resource after a call.
///
/// The booth override is surfaced back to the front end through this
/// dedicated export rather than the general mocked-resource reflection,
/// because network-facing callers sanitize this view separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoothModified {
    /// Final booth configuration content.
    pub config: String,
    /// Final booth key content.
    pub key: String,
}
