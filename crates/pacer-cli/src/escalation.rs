//! Report escalation: the single conversion point from a raised failure
//! batch to the process exit code.
//!
//! No other layer terminates the process or prints a final verdict. On
//! success the command's result passes through untouched.

use std::process::ExitCode;
use std::sync::Mutex;

use pacer_lib::reports::{CommandResult, ReportItem, ReportSink, Severity};

use crate::front_env::FrontEndEnvironment;

/// Exit code used when a failure batch escalates.
pub const FAILURE_EXIT: u8 = 1;

/// Run a command and escalate a raised batch.
///
/// Every report in the batch is presented through the front environment's
/// sink before the terminal outcome is produced; no partial success is
/// reported once escalation triggers.
pub fn run<T, F>(front: &mut FrontEndEnvironment, command: F) -> Result<T, ExitCode>
where
    F: FnOnce(&mut FrontEndEnvironment) -> CommandResult<T>,
{
    match command(front) {
        Ok(value) => Ok(value),
        Err(batch) => {
            for item in batch.items() {
                front.sink.report(item);
            }
            Err(ExitCode::from(FAILURE_EXIT))
        }
    }
}

/// Sink presenting reports on the console.
///
/// Errors and warnings go to stderr, the rest to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ReportSink for ConsoleSink {
    fn report(&self, item: &ReportItem) {
        match item.severity {
            Severity::Error | Severity::Warning => eprintln!("{}", item),
            Severity::Info => println!("{}", item.message),
            Severity::Debug => tracing::debug!(code = %item.code, "{}", item.message),
        }
    }
}

/// Sink collecting items, for tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    items: Mutex<Vec<ReportItem>>,
}

impl CollectingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn items(&self) -> Vec<ReportItem> {
        self.items.lock().unwrap().clone()
    }
}

impl ReportSink for CollectingSink {
    fn report(&self, item: &ReportItem) {
        self.items.lock().unwrap().push(item.clone());
    }
}
