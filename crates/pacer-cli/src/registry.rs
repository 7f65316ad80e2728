//! Command registry: groups mapped to their operation sets.
//!
//! The registry is constructed once at process start and passed by
//! reference to call sites. Entries are immutable after build, so repeated
//! resolution returns the identical cached object and concurrent lookup
//! needs no locking.

use std::collections::HashMap;
use std::sync::Arc;

use pacer_lib::commands::{self, CommandGroup, CommandOutput, UnknownGroupError};
use pacer_lib::env::LibraryEnvironment;
use pacer_lib::reports::{CommandResult, ReportBatch, ReportItem};
use pacer_lib::resource::ResourceKind;

type DispatchFn = fn(&str, &mut LibraryEnvironment, &[String]) -> CommandResult<CommandOutput>;

/// The operations of one command group.
#[derive(Debug)]
pub struct OperationSet {
    group: CommandGroup,
    /// Resources covered by this group's middleware, in chain order.
    resources: &'static [ResourceKind],
    dispatch: DispatchFn,
}

impl OperationSet {
    /// The group this set belongs to.
    pub fn group(&self) -> CommandGroup {
        self.group
    }

    /// Resources whose middleware wraps this group's commands.
    pub fn resources(&self) -> &'static [ResourceKind] {
        self.resources
    }

    /// Run a command of this group.
    pub fn run(
        &self,
        command: &str,
        env: &mut LibraryEnvironment,
        args: &[String],
    ) -> CommandResult<CommandOutput> {
        (self.dispatch)(command, env, args)
    }
}

/// Immutable registry built once per process.
pub struct CommandRegistry {
    entries: HashMap<CommandGroup, Arc<OperationSet>>,
}

impl CommandRegistry {
    /// Build every group's operation set.
    pub fn build() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            CommandGroup::Cluster,
            Arc::new(OperationSet {
                group: CommandGroup::Cluster,
                resources: &[ResourceKind::Cib],
                dispatch: dispatch_cluster,
            }),
        );
        entries.insert(
            CommandGroup::Quorum,
            Arc::new(OperationSet {
                group: CommandGroup::Quorum,
                resources: &[ResourceKind::CorosyncConf],
                dispatch: dispatch_quorum,
            }),
        );
        entries.insert(
            CommandGroup::Booth,
            Arc::new(OperationSet {
                group: CommandGroup::Booth,
                resources: &[ResourceKind::Booth, ResourceKind::Cib],
                dispatch: dispatch_booth,
            }),
        );
        entries.insert(
            CommandGroup::Node,
            Arc::new(OperationSet {
                group: CommandGroup::Node,
                resources: &[ResourceKind::Cib],
                dispatch: dispatch_node,
            }),
        );
        Self { entries }
    }

    /// Resolve a group to its cached operation set. O(1) after build; every
    /// call returns the identical object.
    pub fn resolve(&self, group: CommandGroup) -> Arc<OperationSet> {
        // Every variant is inserted in build(), so the entry exists.
        Arc::clone(&self.entries[&group])
    }

    /// Resolve a group name from untrusted input.
    pub fn lookup(&self, name: &str) -> Result<Arc<OperationSet>, UnknownGroupError> {
        CommandGroup::from_name(name).map(|group| self.resolve(group))
    }
}

fn unknown_command(group: CommandGroup, command: &str) -> ReportBatch {
    ReportBatch::single(ReportItem::error(
        "UNKNOWN_COMMAND",
        format!("unknown command '{} {}'", group, command),
    ))
}

fn expect_args(command: &str, args: &[String], count: usize) -> CommandResult<()> {
    if args.len() == count {
        Ok(())
    } else {
        Err(ReportBatch::single(ReportItem::error(
            "INVALID_ARGUMENTS",
            format!(
                "'{}' expects {} argument(s), got {}",
                command,
                count,
                args.len()
            ),
        )))
    }
}

fn dispatch_cluster(
    command: &str,
    env: &mut LibraryEnvironment,
    args: &[String],
) -> CommandResult<CommandOutput> {
    match command {
        "verify" => {
            expect_args(command, args, 0)?;
            commands::cluster::verify(env)
        }
        "set-property" => {
            expect_args(command, args, 2)?;
            commands::cluster::set_property(env, &args[0], &args[1])
        }
        _ => Err(unknown_command(CommandGroup::Cluster, command)),
    }
}

fn dispatch_quorum(
    command: &str,
    env: &mut LibraryEnvironment,
    args: &[String],
) -> CommandResult<CommandOutput> {
    match command {
        "get-config" => {
            expect_args(command, args, 0)?;
            commands::quorum::get_config(env)
        }
        "set-options" => {
            let options = parse_options(args)?;
            commands::quorum::set_options(env, &options)
        }
        _ => Err(unknown_command(CommandGroup::Quorum, command)),
    }
}

fn dispatch_booth(
    command: &str,
    env: &mut LibraryEnvironment,
    args: &[String],
) -> CommandResult<CommandOutput> {
    match command {
        "ticket-add" => {
            expect_args(command, args, 1)?;
            commands::booth::ticket_add(env, &args[0])
        }
        "ticket-remove" => {
            expect_args(command, args, 1)?;
            commands::booth::ticket_remove(env, &args[0])
        }
        "config-text" => {
            expect_args(command, args, 0)?;
            commands::booth::config_text(env)
        }
        _ => Err(unknown_command(CommandGroup::Booth, command)),
    }
}

fn dispatch_node(
    command: &str,
    env: &mut LibraryEnvironment,
    args: &[String],
) -> CommandResult<CommandOutput> {
    match command {
        "standby" => {
            expect_args(command, args, 1)?;
            commands::node::standby(env, &args[0])
        }
        "unstandby" => {
            expect_args(command, args, 1)?;
            commands::node::unstandby(env, &args[0])
        }
        _ => Err(unknown_command(CommandGroup::Node, command)),
    }
}

/// Parse `name=value` arguments.
fn parse_options(args: &[String]) -> CommandResult<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| {
                    ReportBatch::single(ReportItem::error(
                        "INVALID_ARGUMENTS",
                        format!("expected name=value, got '{}'", arg),
                    ))
                })
        })
        .collect()
}
