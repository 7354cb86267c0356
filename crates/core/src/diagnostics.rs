//! Recoverable problems found while parsing, correlating and resolving.
//!
//! None of these abort a run. Each phase returns its best-effort result and
//! pushes what went wrong into a [`Diagnostics`] collector, which also logs
//! every entry through `tracing`.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// One recoverable problem.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A debug-text source or chip device could not be opened.
    #[error("{path}: source unavailable: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// A line did not match its expected record shape.
    #[error("{source_name}:{line_no}: malformed record: {text:?}")]
    MalformedRecord { source_name: String, line_no: usize, text: String },

    /// Two descriptors claimed the same line number on one chip.
    #[error("{chip}: duplicate line {line_number}: keeping {kept:?}, discarding {discarded:?}")]
    DuplicateLineNumber { chip: String, line_number: u32, kept: String, discarded: String },

    /// A strict-mode name request matched more than one line.
    #[error(
        "line {identifier:?} is not unique: matched {first_chip} {first_offset} and \
         {second_chip} {second_offset}"
    )]
    AmbiguousNameMatch {
        identifier: String,
        first_chip: String,
        first_offset: u32,
        second_chip: String,
        second_offset: u32,
    },

    /// A requested identifier never matched a line.
    #[error("cannot find line {identifier:?}")]
    UnresolvedRequest { identifier: String },

    /// Two requests resolved to the same kernel line.
    #[error("lines {first:?} and {second:?} are the same line ({chip} {offset})")]
    SameLineRequest { first: String, second: String, chip: String, offset: u32 },

    /// A safety ceiling was hit and further records were dropped.
    #[error("{what}: capacity of {limit} exceeded, {dropped} record(s) dropped")]
    CapacityExceeded { what: String, limit: usize, dropped: usize },
}

/// Ordered collection of diagnostics for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem and log it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    /// Record a problem that the caller reports to the user itself.
    pub fn push_quiet(&mut self, diagnostic: Diagnostic) {
        debug!("{diagnostic}");
        self.entries.push(diagnostic);
    }

    /// Move every entry of `other` into this collection without logging again.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Count entries matching a predicate, e.g. only malformed records.
    pub fn count(&self, pred: impl Fn(&Diagnostic) -> bool) -> usize {
        self.entries.iter().filter(|d| pred(d)).count()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
