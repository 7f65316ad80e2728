//! Middleware chain wrapping command execution.
//!
//! Each unit is a before/after pair around one resource: `before` loads an
//! override into the front environment (turning the resource mocked for the
//! call), `after` persists the reflected blob once the command returned
//! normally. The chain order is fixed per group at registration and
//! identical across calls.

use std::path::PathBuf;

use pacer_lib::env::LibraryEnvironment;
use pacer_lib::reports::{CommandResult, ReportBatch, ReportItem};

use crate::bridge;
use crate::front_env::{BoothOverride, FrontEndEnvironment};

fn io_batch(code: &str, path: &PathBuf, err: std::io::Error) -> ReportBatch {
    ReportBatch::single(ReportItem::error(
        code,
        format!("{}: {}", path.display(), err),
    ))
}

/// One before/after pair around a resource.
#[derive(Debug, Clone)]
pub enum MiddlewareUnit {
    /// Run the command against a CIB file instead of the live cluster.
    CibFile(PathBuf),
    /// Run the command against a transport-configuration file.
    CorosyncFile(PathBuf),
    /// Run the command against booth configuration and key files.
    BoothFiles {
        /// Booth instance name.
        name: String,
        /// Path to the configuration file.
        config: PathBuf,
        /// Path to the key file.
        key: PathBuf,
    },
}

impl MiddlewareUnit {
    fn before(&self, front: &mut FrontEndEnvironment) -> CommandResult<()> {
        match self {
            MiddlewareUnit::CibFile(path) => {
                let data = std::fs::read_to_string(path)
                    .map_err(|e| io_batch("CIB_FILE_READ_FAILED", path, e))?;
                front.cib_data = Some(data);
            }
            MiddlewareUnit::CorosyncFile(path) => {
                let data = std::fs::read_to_string(path)
                    .map_err(|e| io_batch("COROSYNC_FILE_READ_FAILED", path, e))?;
                front.corosync_conf_data = Some(data);
            }
            MiddlewareUnit::BoothFiles { name, config, key } => {
                let config_data = std::fs::read_to_string(config)
                    .map_err(|e| io_batch("BOOTH_FILE_READ_FAILED", config, e))?;
                let key_data = std::fs::read_to_string(key)
                    .map_err(|e| io_batch("BOOTH_FILE_READ_FAILED", key, e))?;
                front.booth = Some(BoothOverride {
                    name: name.clone(),
                    config_data,
                    key_data,
                    modified: None,
                });
            }
        }
        Ok(())
    }

    fn after(&self, front: &mut FrontEndEnvironment) -> CommandResult<()> {
        match self {
            MiddlewareUnit::CibFile(path) => {
                if let Some(data) = &front.cib_data {
                    std::fs::write(path, data)
                        .map_err(|e| io_batch("CIB_FILE_WRITE_FAILED", path, e))?;
                }
            }
            MiddlewareUnit::CorosyncFile(path) => {
                if let Some(data) = &front.corosync_conf_data {
                    std::fs::write(path, data)
                        .map_err(|e| io_batch("COROSYNC_FILE_WRITE_FAILED", path, e))?;
                }
            }
            MiddlewareUnit::BoothFiles { config, key, .. } => {
                let modified = front.booth.as_ref().and_then(|b| b.modified.clone());
                if let Some(modified) = modified {
                    std::fs::write(config, &modified.config)
                        .map_err(|e| io_batch("BOOTH_FILE_WRITE_FAILED", config, e))?;
                    std::fs::write(key, &modified.key)
                        .map_err(|e| io_batch("BOOTH_FILE_WRITE_FAILED", key, e))?;
                }
            }
        }
        Ok(())
    }
}

/// Ordered wrapping of one command execution.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChain {
    units: Vec<MiddlewareUnit>,
}

impl MiddlewareChain {
    /// Build a chain from units in execution order.
    pub fn new(units: Vec<MiddlewareUnit>) -> Self {
        Self { units }
    }

    /// Run a command through the chain.
    ///
    /// Before-units run in order, then the bridge builds the library
    /// environment, the command runs, and on normal return only the mocked
    /// blobs are reflected back and after-units run in reverse order. The
    /// command's result is returned unchanged.
    pub fn execute<T, F>(&self, front: &mut FrontEndEnvironment, command: F) -> CommandResult<T>
    where
        F: FnOnce(&mut LibraryEnvironment) -> CommandResult<T>,
    {
        for unit in &self.units {
            unit.before(front)?;
        }
        let mut lib = bridge::to_library(front);
        let result = command(&mut lib)?;
        bridge::reflect(&lib, front);
        for unit in self.units.iter().rev() {
            unit.after(front)?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacer_lib::commands::CommandOutput;
    use pacer_lib::reports::TracingSink;
    use pacer_lib::resource::{MemStore, ResourceKind};
    use std::sync::Arc;

    fn front() -> FrontEndEnvironment {
        FrontEndEnvironment::new(Arc::new(TracingSink), Arc::new(MemStore::new()))
    }

    #[test]
    fn test_mocked_round_trip() {
        let mut front = front();
        front.cib_data = Some("<cib/>".to_string());
        let chain = MiddlewareChain::default();
        chain
            .execute(&mut front, |env| {
                env.write_resource(ResourceKind::Cib, "<cib version='2'/>".to_string())?;
                Ok(CommandOutput::None)
            })
            .unwrap();
        // The front environment's field equals the command's final value.
        assert_eq!(front.cib_data.as_deref(), Some("<cib version='2'/>"));
    }

    #[test]
    fn test_live_write_observable_and_front_untouched() {
        let store = Arc::new(MemStore::new());
        store.seed(ResourceKind::Cib, "<cib/>");
        let mut front = FrontEndEnvironment::new(Arc::new(TracingSink), store.clone());
        let chain = MiddlewareChain::default();
        chain
            .execute(&mut front, |env| {
                env.write_resource(ResourceKind::Cib, "updated".to_string())?;
                // Observable through the accessor before the call returns.
                assert_eq!(store.snapshot(ResourceKind::Cib).unwrap(), "updated");
                Ok(CommandOutput::None)
            })
            .unwrap();
        assert!(front.cib_data.is_none());
    }

    #[test]
    fn test_failed_call_skips_reflection() {
        let mut front = front();
        front.cib_data = Some("<cib/>".to_string());
        let chain = MiddlewareChain::default();
        let result: CommandResult<CommandOutput> = chain.execute(&mut front, |env| {
            env.write_resource(ResourceKind::Cib, "half-done".to_string())?;
            Err(ReportBatch::single(ReportItem::error("BOOM", "failed")))
        });
        assert!(result.is_err());
        // Inconsistent blobs from a failed call are not surfaced.
        assert_eq!(front.cib_data.as_deref(), Some("<cib/>"));
    }

    #[test]
    fn test_cib_file_unit_loads_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cib.xml");
        std::fs::write(&path, "<cib/>").unwrap();

        let mut front = front();
        let chain = MiddlewareChain::new(vec![MiddlewareUnit::CibFile(path.clone())]);
        chain
            .execute(&mut front, |env| {
                assert!(!env.is_live(ResourceKind::Cib));
                env.write_resource(ResourceKind::Cib, "<cib version='2'/>".to_string())?;
                Ok(CommandOutput::None)
            })
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "<cib version='2'/>"
        );
    }

    #[test]
    fn test_booth_files_unit_uses_modified_export() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("booth.conf");
        let key = dir.path().join("booth.key");
        std::fs::write(&config, "").unwrap();
        std::fs::write(&key, "authkey").unwrap();

        let mut front = front();
        let chain = MiddlewareChain::new(vec![MiddlewareUnit::BoothFiles {
            name: "booth".to_string(),
            config: config.clone(),
            key: key.clone(),
        }]);
        chain
            .execute(&mut front, |env| {
                env.write_resource(ResourceKind::Booth, "ticket=\"a\"\n".to_string())?;
                Ok(CommandOutput::None)
            })
            .unwrap();
        assert_eq!(std::fs::read_to_string(&config).unwrap(), "ticket=\"a\"\n");
        assert_eq!(std::fs::read_to_string(&key).unwrap(), "authkey");
    }

    #[test]
    fn test_missing_file_fails_before_command_runs() {
        let mut front = front();
        let chain = MiddlewareChain::new(vec![MiddlewareUnit::CibFile(PathBuf::from(
            "/nonexistent/cib.xml",
        ))]);
        let mut ran = false;
        let result: CommandResult<CommandOutput> = chain.execute(&mut front, |_| {
            ran = true;
            Ok(CommandOutput::None)
        });
        let err = result.unwrap_err();
        assert_eq!(err.items()[0].code, "CIB_FILE_READ_FAILED");
        assert!(!ran);
    }
}
