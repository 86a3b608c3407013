//! CLI error types

use consume_fixtures::ConsumeError;
use std::path::PathBuf;
use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Input path does not exist
    #[error("No such fixture file or directory: {}", .0.display())]
    MissingInput(PathBuf),

    /// At least one case failed or errored
    #[error("{failed} failed, {errors} errored")]
    Failures {
        /// Cases whose verdict was a failure
        failed: usize,
        /// Files that could not be consumed at all
        errors: usize,
    },

    /// Fixture consumption error
    #[error(transparent)]
    Consume(#[from] ConsumeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
