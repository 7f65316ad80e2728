//! Pacer library layer.
//!
//! This crate holds the pieces shared by the pacer front ends: structured
//! reports, the per-call library environment, the live/mocked resource
//! model, and the command groups operating on cluster configuration.

pub mod commands;
pub mod env;
pub mod reports;
pub mod resource;

pub use commands::{CommandGroup, CommandOutput, UnknownGroupError};
pub use env::{KnownHostsGetter, LibraryEnvironment};
pub use reports::{CommandResult, ReportBatch, ReportItem, ReportList, ReportSink, Severity, TracingSink};
pub use resource::{BoothModified, FsStore, LiveStore, MemStore, ResourceKind, StoreError};
