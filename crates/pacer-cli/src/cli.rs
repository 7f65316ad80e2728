//! Command-line argument surface.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use pacer_lib::commands::CommandGroup;
use pacer_lib::resource::{FsStore, ResourceKind};

use crate::escalation::ConsoleSink;
use crate::front_env::FrontEndEnvironment;
use crate::middleware::{MiddlewareChain, MiddlewareUnit};

/// Pacer command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "pacer")]
#[command(about = "Cluster configuration management")]
pub struct Args {
    /// Run against a CIB file instead of the live cluster.
    #[arg(short = 'f', long)]
    pub cib_file: Option<PathBuf>,

    /// Run against a corosync configuration file.
    #[arg(long)]
    pub corosync_conf_file: Option<PathBuf>,

    /// Booth instance name; selects its configuration and key files.
    #[arg(long, default_value = "booth")]
    pub booth_name: String,

    /// Run against a booth configuration file.
    #[arg(long)]
    pub booth_conf_file: Option<PathBuf>,

    /// Booth key file, required alongside --booth-conf-file.
    #[arg(long)]
    pub booth_key_file: Option<PathBuf>,

    /// Timeout (ms) for outbound node requests.
    #[arg(long, default_value_t = 60_000)]
    pub request_timeout_ms: u64,

    /// Path to the live CIB.
    #[arg(long, default_value = "/var/lib/pacer/cib.xml")]
    pub cib_path: PathBuf,

    /// Path to the live corosync configuration.
    #[arg(long, default_value = "/etc/corosync/corosync.conf")]
    pub corosync_conf_path: PathBuf,

    /// Path to the live booth configuration.
    #[arg(long, default_value = "/etc/booth/booth.conf")]
    pub booth_conf_path: PathBuf,

    /// Command group.
    #[arg(value_parser = parse_group)]
    pub group: CommandGroup,

    /// Command within the group.
    pub command: String,

    /// Command arguments.
    pub args: Vec<String>,
}

fn parse_group(name: &str) -> Result<CommandGroup, String> {
    CommandGroup::from_name(name).map_err(|e| e.to_string())
}

impl Args {
    /// Build the front-end environment for this invocation.
    pub fn front_env(&self) -> FrontEndEnvironment {
        let store = Arc::new(FsStore::new(
            self.cib_path.clone(),
            self.corosync_conf_path.clone(),
            self.booth_conf_path.clone(),
        ));
        let mut front = FrontEndEnvironment::new(Arc::new(ConsoleSink), store);
        front.request_timeout = Duration::from_millis(self.request_timeout_ms);
        front
    }

    /// Build the middleware chain for a group's declared resources.
    ///
    /// Only resources the group registered get a unit, and only when the
    /// matching file override was given on the command line.
    pub fn middleware_for(&self, resources: &[ResourceKind]) -> MiddlewareChain {
        let mut units = Vec::new();
        for kind in resources {
            match kind {
                ResourceKind::Cib => {
                    if let Some(path) = &self.cib_file {
                        units.push(MiddlewareUnit::CibFile(path.clone()));
                    }
                }
                ResourceKind::CorosyncConf => {
                    if let Some(path) = &self.corosync_conf_file {
                        units.push(MiddlewareUnit::CorosyncFile(path.clone()));
                    }
                }
                ResourceKind::Booth => {
                    if let (Some(config), Some(key)) = (&self.booth_conf_file, &self.booth_key_file)
                    {
                        units.push(MiddlewareUnit::BoothFiles {
                            name: self.booth_name.clone(),
                            config: config.clone(),
                            key: key.clone(),
                        });
                    }
                }
            }
        }
        MiddlewareChain::new(units)
    }
}
