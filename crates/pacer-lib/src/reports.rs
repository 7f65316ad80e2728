//! Structured reports collected during command execution.
//!
//! Commands never print or terminate on their own. Diagnostics are emitted
//! as severity-tagged [`ReportItem`]s through a [`ReportSink`], and failures
//! surface as a [`ReportBatch`] carried in the command's result value. Only
//! the outermost entry point converts a batch into an exit code or an HTTP
//! response.

use std::fmt;

/// Severity of a single report item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Diagnostic detail, normally hidden.
    Debug,
    /// Informational message.
    Info,
    /// Something suspicious, the command still proceeds.
    Warning,
    /// The command cannot complete.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Debug => "Debug",
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        write!(f, "{}", label)
    }
}

/// One severity-tagged diagnostic item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    /// Severity of the item.
    pub severity: Severity,
    /// Stable machine-readable code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl ReportItem {
    /// Create an item with the given severity.
    pub fn new(severity: Severity, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create an error-severity item.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Create a warning-severity item.
    pub fn warning(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Create an info-severity item.
    pub fn info(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, code, message)
    }
}

impl fmt::Display for ReportItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Ordered collection of report items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportList {
    items: Vec<ReportItem>,
}

impl ReportList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item, preserving arrival order.
    pub fn push(&mut self, item: ReportItem) {
        self.items.push(item);
    }

    /// Whether any item has error severity.
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.severity == Severity::Error)
    }

    /// Iterate over the collected items.
    pub fn iter(&self) -> impl Iterator<Item = &ReportItem> {
        self.items.iter()
    }

    /// Number of collected items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert into a failure batch if any item is an error.
    pub fn into_batch(self) -> Option<ReportBatch> {
        if self.has_errors() {
            Some(ReportBatch { items: self.items })
        } else {
            None
        }
    }
}

/// A raised failure: a non-empty report list containing at least one
/// error-severity item.
///
/// This is the value side of the explicit result type replacing
/// exception-driven escalation. It deliberately does not implement
/// conversion back into a plain message; callers present every item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBatch {
    items: Vec<ReportItem>,
}

impl ReportBatch {
    /// Build a batch from a single error item.
    pub fn single(item: ReportItem) -> Self {
        debug_assert_eq!(item.severity, Severity::Error);
        Self { items: vec![item] }
    }

    /// Build a batch from collected items. At least one must be an error.
    pub fn from_items(items: Vec<ReportItem>) -> Self {
        debug_assert!(items.iter().any(|i| i.severity == Severity::Error));
        Self { items }
    }

    /// The items in arrival order.
    pub fn items(&self) -> &[ReportItem] {
        &self.items
    }

    /// Number of error-severity items.
    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }
}

impl fmt::Display for ReportBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} report(s), {} error(s)",
            self.items.len(),
            self.error_count()
        )
    }
}

impl std::error::Error for ReportBatch {}

/// Result of a library command: a value or a raised failure batch.
pub type CommandResult<T> = Result<T, ReportBatch>;

/// Receives report items for presentation.
///
/// Implementations decide how a severity is rendered (stderr, log, HTTP
/// payload). Sinks are shared across the call, hence `&self`.
pub trait ReportSink: Send + Sync {
    /// Present one item.
    fn report(&self, item: &ReportItem);
}

/// Sink that forwards items to the `tracing` subscriber.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn report(&self, item: &ReportItem) {
        match item.severity {
            Severity::Debug => tracing::debug!(code = %item.code, "{}", item.message),
            Severity::Info => tracing::info!(code = %item.code, "{}", item.message),
            Severity::Warning => tracing::warn!(code = %item.code, "{}", item.message),
            Severity::Error => tracing::error!(code = %item.code, "{}", item.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let mut list = ReportList::new();
        list.push(ReportItem::info("INFO", "hello"));
        assert!(!list.has_errors());
        list.push(ReportItem::error("BROKEN", "nope"));
        assert!(list.has_errors());
    }

    #[test]
    fn test_into_batch_requires_error() {
        let mut list = ReportList::new();
        list.push(ReportItem::warning("W", "warn only"));
        assert!(list.clone().into_batch().is_none());
        list.push(ReportItem::error("E", "now an error"));
        let batch = list.into_batch().unwrap();
        assert_eq!(batch.items().len(), 2);
        assert_eq!(batch.error_count(), 1);
    }

    #[test]
    fn test_batch_preserves_order() {
        let batch = ReportBatch::from_items(vec![
            ReportItem::warning("FIRST", "a"),
            ReportItem::error("SECOND", "b"),
        ]);
        assert_eq!(batch.items()[0].code, "FIRST");
        assert_eq!(batch.items()[1].code, "SECOND");
    }
}
