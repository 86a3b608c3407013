//! # consume-clis
//!
//! Runs fixtures through an external client's command-line test runners.
//!
//! This crate provides:
//! - Binary identity detection and help-text capability probing
//! - Process invocation with captured exit code, stdout and stderr
//! - `statetest` and `blocktest` runners
//! - Reproduction bundles for single invocations
//! - The go-ethereum `evm` family: exception table and fixture consumer
//!
//! ## Invocation contract
//!
//! ```text
//! evm [--debug --json --verbosity 100] statetest <fixture>
//! evm [--debug --json --verbosity 100] blocktest [--run <case>] <fixture>
//! ```
//!
//! Exit code 0 means every case passed. `statetest` prints a JSON array of
//! per-case records; `blocktest` prints nothing parseable.
//!
//! Every call is synchronous and spawns exactly one child process. Nothing
//! is retried and no timeout is applied.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod blocktest;
pub mod clis;
mod debug_dump;
mod process;
mod registry;
mod statetest;
mod tool;

pub use blocktest::{BlockTestRunner, RUN_FLAG};
pub use debug_dump::{
    DebugBundle, ARGS_FILE, DEBUG_FIXTURE_FILE, RETURNCODE_FILE, SCRIPT_FILE, STDERR_FILE,
    STDOUT_FILE,
};
pub use process::{run_command, InvocationResult};
pub use registry::BinaryRoles;
pub use statetest::StateTestRunner;
pub use tool::{ConsumerTool, ToolBinary, ToolCapabilityProbe, DEBUG_FLAGS};
