//! Ordered exception tables

use crate::kinds::ExceptionKind;
use std::borrow::Cow;

/// One `(kind, pattern)` row of an exception table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionEntry {
    /// Canonical kind this row maps to
    pub kind: ExceptionKind,
    /// Literal substring of the client's error text
    pub pattern: Cow<'static, str>,
}

impl ExceptionEntry {
    /// Create a new entry
    pub fn new(kind: impl Into<ExceptionKind>, pattern: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind: kind.into(),
            pattern: pattern.into(),
        }
    }

    /// Whether this entry's pattern occurs in `text`
    pub fn matches(&self, text: &str) -> bool {
        text.contains(self.pattern.as_ref())
    }
}

/// Ordered list of exception entries for one external client.
///
/// Order is part of the table's contract: classification picks the first
/// matching row, so a row whose pattern contains an earlier row's pattern
/// can never be selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionTable {
    client: String,
    entries: Vec<ExceptionEntry>,
}

impl ExceptionTable {
    /// Create a table for `client` from rows in match order
    pub fn new(client: impl Into<String>, entries: Vec<ExceptionEntry>) -> Self {
        Self {
            client: client.into(),
            entries,
        }
    }

    /// Build a table from static `(kind, pattern)` rows
    pub fn from_static(client: impl Into<String>, rows: &[(ExceptionKind, &'static str)]) -> Self {
        let entries = rows
            .iter()
            .map(|(kind, pattern)| ExceptionEntry::new(*kind, *pattern))
            .collect();
        Self::new(client, entries)
    }

    /// Name of the client this table describes
    pub fn client(&self) -> &str {
        &self.client
    }

    /// Rows in match order
    pub fn entries(&self) -> &[ExceptionEntry] {
        &self.entries
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a row ahead of every existing row
    pub fn prepend(&mut self, entry: ExceptionEntry) {
        self.entries.insert(0, entry);
    }

    /// Append a row after every existing row
    pub fn push(&mut self, entry: ExceptionEntry) {
        self.entries.push(entry);
    }

    /// Insert a row at `index`, shifting later rows down.
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, entry: ExceptionEntry) {
        self.entries.insert(index, entry);
    }

    /// Position of the first row with this exact pattern
    pub fn position(&self, pattern: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.pattern == pattern)
    }

    /// Rows that can never be selected because an earlier row's pattern is a
    /// substring of theirs. Returns `(earlier, shadowed)` index pairs.
    pub fn shadowed_entries(&self) -> Vec<(usize, usize)> {
        let mut shadowed = Vec::new();
        for (later, entry) in self.entries.iter().enumerate() {
            if let Some(earlier) = self.entries[..later]
                .iter()
                .position(|prev| entry.pattern.contains(prev.pattern.as_ref()))
            {
                shadowed.push((earlier, later));
            }
        }
        shadowed
    }
}
