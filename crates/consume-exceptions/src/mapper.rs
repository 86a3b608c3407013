//! Error-text classification

use crate::kinds::ExceptionKind;
use crate::table::ExceptionTable;
use serde::{Serialize, Serializer};
use std::fmt;

/// Result of classifying a piece of error text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// A table row matched
    Mapped(ExceptionKind),
    /// No row matched; the failure reason is unknown
    Unmapped,
}

impl Classification {
    /// The mapped kind, if any
    pub fn kind(&self) -> Option<ExceptionKind> {
        match self {
            Classification::Mapped(kind) => Some(*kind),
            Classification::Unmapped => None,
        }
    }

    /// Whether a row matched
    pub fn is_mapped(&self) -> bool {
        matches!(self, Classification::Mapped(_))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classification::Mapped(kind) => write!(f, "{}", kind),
            Classification::Unmapped => write!(f, "unmapped"),
        }
    }
}

impl Serialize for Classification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Maps free-text client errors onto canonical kinds using one client's table
#[derive(Debug, Clone)]
pub struct ExceptionMapper {
    table: ExceptionTable,
}

impl ExceptionMapper {
    /// Create a mapper over `table`
    pub fn new(table: ExceptionTable) -> Self {
        Self { table }
    }

    /// The table in match order
    pub fn table(&self) -> &ExceptionTable {
        &self.table
    }

    /// Classify `text`: the kind of the first row whose pattern occurs in it
    pub fn classify(&self, text: &str) -> Classification {
        self.table
            .entries()
            .iter()
            .find(|entry| entry.matches(text))
            .map(|entry| Classification::Mapped(entry.kind))
            .unwrap_or(Classification::Unmapped)
    }

    /// First pattern the client prints for `kind`
    pub fn message_for(&self, kind: ExceptionKind) -> Option<&str> {
        self.table
            .entries()
            .iter()
            .find(|entry| entry.kind == kind)
            .map(|entry| entry.pattern.as_ref())
    }
}
