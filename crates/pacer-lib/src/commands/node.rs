//! Node attribute commands.

use crate::commands::{blob, CommandOutput};
use crate::env::LibraryEnvironment;
use crate::reports::{CommandResult, ReportBatch, ReportItem};
use crate::resource::ResourceKind;

fn validate_node_name(name: &str) -> CommandResult<()> {
    if name.is_empty() || name.contains(' ') {
        return Err(ReportBatch::single(ReportItem::error(
            "INVALID_NODE_NAME",
            format!("invalid node name '{}'", name),
        )));
    }
    Ok(())
}

/// Put a node into standby mode.
pub fn standby(env: &mut LibraryEnvironment, node: &str) -> CommandResult<CommandOutput> {
    validate_node_name(node)?;
    let cib = env.read_resource(ResourceKind::Cib)?;
    let line = format!("node {} standby=on", node);
    let prefix = format!("node {} standby=", node);
    let updated = blob::upsert_line(&cib, &prefix, &line);
    env.write_resource(ResourceKind::Cib, updated)?;
    Ok(CommandOutput::None)
}

/// Take a node out of standby mode.
pub fn unstandby(env: &mut LibraryEnvironment, node: &str) -> CommandResult<CommandOutput> {
    validate_node_name(node)?;
    let cib = env.read_resource(ResourceKind::Cib)?;
    let prefix = format!("node {} standby=", node);
    let (updated, removed) = blob::remove_line(&cib, &prefix);
    if !removed {
        // Not an error: the node simply was not in standby.
        env.report(ReportItem::info(
            "NODE_NOT_STANDBY",
            format!("node '{}' is not in standby mode", node),
        ));
        return Ok(CommandOutput::None);
    }
    env.write_resource(ResourceKind::Cib, updated)?;
    Ok(CommandOutput::None)
}
