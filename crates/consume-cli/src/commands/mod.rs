//! Subcommand implementations

pub mod classify;
pub mod direct;
pub mod probe;
