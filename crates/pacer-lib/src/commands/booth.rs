//! Ticket-manager (booth) commands.

use crate::commands::{blob, CommandOutput};
use crate::env::LibraryEnvironment;
use crate::reports::{CommandResult, ReportBatch, ReportItem};
use crate::resource::ResourceKind;

fn validate_ticket_name(name: &str) -> CommandResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ReportBatch::single(ReportItem::error(
            "INVALID_TICKET_NAME",
            format!("invalid ticket name '{}'", name),
        )))
    }
}

fn ticket_line(name: &str) -> String {
    format!("ticket=\"{}\"", name)
}

// "booth" is the default instance name when no override names one.
fn instance(env: &LibraryEnvironment) -> &str {
    env.booth_name().unwrap_or("booth")
}

/// Add a ticket to the booth configuration.
pub fn ticket_add(env: &mut LibraryEnvironment, name: &str) -> CommandResult<CommandOutput> {
    validate_ticket_name(name)?;
    let conf = env.read_resource(ResourceKind::Booth)?;
    let line = ticket_line(name);
    if blob::has_line(&conf, &line) {
        return Err(ReportBatch::single(ReportItem::error(
            "TICKET_EXISTS",
            format!(
                "ticket '{}' already exists in booth instance '{}'",
                name,
                instance(env)
            ),
        )));
    }
    let updated = blob::upsert_line(&conf, &line, &line);
    env.write_resource(ResourceKind::Booth, updated)?;
    Ok(CommandOutput::None)
}

/// Remove a ticket from the booth configuration.
pub fn ticket_remove(env: &mut LibraryEnvironment, name: &str) -> CommandResult<CommandOutput> {
    validate_ticket_name(name)?;
    let conf = env.read_resource(ResourceKind::Booth)?;
    let (updated, removed) = blob::remove_line(&conf, &ticket_line(name));
    if !removed {
        return Err(ReportBatch::single(ReportItem::error(
            "TICKET_NOT_FOUND",
            format!(
                "ticket '{}' does not exist in booth instance '{}'",
                name,
                instance(env)
            ),
        )));
    }
    env.write_resource(ResourceKind::Booth, updated)?;
    Ok(CommandOutput::None)
}

/// Return the booth configuration text.
pub fn config_text(env: &mut LibraryEnvironment) -> CommandResult<CommandOutput> {
    let conf = env.read_resource(ResourceKind::Booth)?;
    Ok(CommandOutput::Text(conf))
}
