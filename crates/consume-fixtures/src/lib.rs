//! # consume-fixtures
//!
//! Fixture-side types shared by every fixture consumer.
//!
//! This crate provides:
//! - The closed set of fixture formats and format detection
//! - Fixture file loading and in-memory fixture materialization
//! - Debug dump directory naming
//! - The consume outcome and error taxonomy
//! - The [`FixtureConsumer`] interface implemented per client family
//!
//! ## Fixture files
//!
//! A fixture file is a JSON object mapping case names to case bodies. The
//! body shape depends on the format; consumers treat it as opaque and only
//! hand the file path to the external binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod consumer;
mod dump_dir;
mod error;
mod file;
mod format;
mod outcome;
mod source;

pub use consumer::FixtureConsumer;
pub use dump_dir::{debug_dump_dir, MAX_CASE_DIR_NAME};
pub use error::{ConsumeError, ConsumeResult};
pub use file::Fixtures;
pub use format::{FixtureFormat, ParseFormatError};
pub use outcome::{ConsumeOutcome, MalformedCase, StateCaseResult};
pub use source::{FixtureSource, MaterializedFixture};
