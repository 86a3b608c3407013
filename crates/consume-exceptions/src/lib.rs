//! # consume-exceptions
//!
//! Client-independent failure taxonomy for fixture consumption.
//!
//! This crate provides:
//! - Canonical exception kinds for transaction and EOF validation failures
//! - Ordered exception tables mapping client error text to canonical kinds
//! - A first-match-wins mapper over such a table
//!
//! ## Matching
//!
//! Each external client prints its own wording for a failure. A table lists
//! `(kind, pattern)` pairs in order; classification returns the kind of the
//! first entry whose pattern occurs in the text. Order matters: a short
//! pattern placed ahead of a longer one that contains it makes the longer
//! entry unreachable (see [`ExceptionTable::shadowed_entries`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

mod kinds;
mod mapper;
mod table;

pub use kinds::{
    EofException, ExceptionKind, ExpectedExceptions, ParseKindError, TransactionException,
};
pub use mapper::{Classification, ExceptionMapper};
pub use table::{ExceptionEntry, ExceptionTable};
