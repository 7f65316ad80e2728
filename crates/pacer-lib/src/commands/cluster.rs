//! Cluster information base commands.

use crate::commands::{blob, CommandOutput};
use crate::env::LibraryEnvironment;
use crate::reports::{CommandResult, ReportBatch, ReportItem};
use crate::resource::ResourceKind;

/// Check the CIB for obvious problems.
pub fn verify(env: &mut LibraryEnvironment) -> CommandResult<CommandOutput> {
    let cib = env.read_resource(ResourceKind::Cib)?;
    if cib.trim().is_empty() {
        return Err(ReportBatch::single(ReportItem::error(
            "CIB_EMPTY",
            "cluster information base is empty",
        )));
    }
    if !blob::has_line(&cib, "property ") {
        env.report(ReportItem::warning(
            "CIB_NO_PROPERTIES",
            "no cluster properties are set",
        ));
    }
    env.report(ReportItem::info("CIB_VERIFIED", "cluster information base verified"));
    Ok(CommandOutput::None)
}

/// Set a cluster property in the CIB.
pub fn set_property(
    env: &mut LibraryEnvironment,
    name: &str,
    value: &str,
) -> CommandResult<CommandOutput> {
    if name.is_empty() || name.contains(['=', ' ']) {
        return Err(ReportBatch::single(ReportItem::error(
            "INVALID_PROPERTY_NAME",
            format!("invalid property name '{}'", name),
        )));
    }
    let cib = env.read_resource(ResourceKind::Cib)?;
    let prefix = format!("property {}=", name);
    let line = format!("property {}={}", name, value);
    let updated = blob::upsert_line(&cib, &prefix, &line);
    env.write_resource(ResourceKind::Cib, updated)?;
    Ok(CommandOutput::None)
}
