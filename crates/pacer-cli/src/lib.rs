//! Pacer command-line front end.
//!
//! Turns an invocation into a library-level operation: the registry maps
//! the command group to its operation set, the middleware chain bridges the
//! front-end environment into a per-call library environment, and report
//! escalation converts a raised failure batch into the process exit code.

pub mod bridge;
pub mod cli;
pub mod escalation;
pub mod front_env;
pub mod middleware;
pub mod registry;

pub use escalation::ConsoleSink;
pub use front_env::{BoothOverride, FrontEndEnvironment};
pub use middleware::{MiddlewareChain, MiddlewareUnit};
pub use registry::{CommandRegistry, OperationSet};
