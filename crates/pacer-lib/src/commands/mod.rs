//! Command groups exposed to the front ends.
//!
//! Groups form a fixed enumerated set; the CLI dispatches on the enum so an
//! unknown group is unrepresentable there. [`CommandGroup::from_name`] is
//! the runtime lookup kept for names arriving from untrusted input.

use thiserror::Error;

pub mod booth;
pub mod cluster;
pub mod node;
pub mod quorum;

/// A group name outside the declared set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command group '{0}'")]
pub struct UnknownGroupError(pub String);

/// The declared command groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandGroup {
    /// Cluster information base operations.
    Cluster,
    /// Quorum / transport configuration operations.
    Quorum,
    /// Ticket-manager operations.
    Booth,
    /// Node attribute operations.
    Node,
}

impl CommandGroup {
    /// Every declared group.
    pub const ALL: [CommandGroup; 4] = [
        CommandGroup::Cluster,
        CommandGroup::Quorum,
        CommandGroup::Booth,
        CommandGroup::Node,
    ];

    /// The group's stable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandGroup::Cluster => "cluster",
            CommandGroup::Quorum => "quorum",
            CommandGroup::Booth => "booth",
            CommandGroup::Node => "node",
        }
    }

    /// Resolve a name from untrusted input.
    pub fn from_name(name: &str) -> Result<Self, UnknownGroupError> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str() == name)
            .ok_or_else(|| UnknownGroupError(name.to_string()))
    }
}

impl std::fmt::Display for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutput {
    /// Nothing to print.
    None,
    /// Text for the caller to present.
    Text(String),
}

/// Line-oriented helpers for the opaque configuration blobs.
///
/// Commands treat blob content as lines of text; the concrete XML/INI
/// rendering happens elsewhere.
pub(crate) mod blob {
    /// Replace the line starting with `prefix`, or append a new one.
    pub fn upsert_line(content: &str, prefix: &str, line: &str) -> String {
        let mut lines: Vec<&str> = content.lines().collect();
        match lines.iter().position(|l| l.trim_start().starts_with(prefix)) {
            Some(idx) => lines[idx] = line,
            None => lines.push(line),
        }
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Remove every line starting with `prefix`; `true` if any was removed.
    pub fn remove_line(content: &str, prefix: &str) -> (String, bool) {
        let before = content.lines().count();
        let lines: Vec<&str> = content
            .lines()
            .filter(|l| !l.trim_start().starts_with(prefix))
            .collect();
        let removed = lines.len() != before;
        let mut out = lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        (out, removed)
    }

    /// Whether a line starting with `prefix` exists.
    pub fn has_line(content: &str, prefix: &str) -> bool {
        content.lines().any(|l| l.trim_start().starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_known() {
        assert_eq!(CommandGroup::from_name("booth").unwrap(), CommandGroup::Booth);
    }

    #[test]
    fn test_from_name_unknown() {
        let err = CommandGroup::from_name("fencing").unwrap_err();
        assert_eq!(err, UnknownGroupError("fencing".to_string()));
    }

    #[test]
    fn test_upsert_line_replaces_and_appends() {
        let content = "a=1\nb=2\n";
        let updated = blob::upsert_line(content, "a=", "a=9");
        assert_eq!(updated, "a=9\nb=2\n");
        let appended = blob::upsert_line(content, "c=", "c=3");
        assert_eq!(appended, "a=1\nb=2\nc=3\n");
    }

    #[test]
    fn test_remove_line() {
        let (out, removed) = blob::remove_line("a=1\nb=2\n", "a=");
        assert!(removed);
        assert_eq!(out, "b=2\n");
        let (_, removed) = blob::remove_line("b=2\n", "a=");
        assert!(!removed);
    }
}
