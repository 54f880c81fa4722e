//! Per-command rendering issues.
//!
//! A problem with one command never aborts the run: the renderer either
//! omits the affected section or skips that command, and records what it did
//! here.

use command_docs_core::DocumentRecord;
use thiserror::Error;

/// A problem found while rendering one command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The command has no epilog; the section built from it was omitted.
    #[error("command '{command}' has no epilog, description section omitted")]
    MissingEpilog { command: String },
    /// The command name cannot be used for a file; the command was skipped.
    #[error("command '{command}' skipped: {reason}")]
    InvalidCommandName {
        command: String,
        reason: &'static str,
    },
}

impl RenderError {
    /// Returns `true` if the command produced no document at all.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::InvalidCommandName { .. })
    }
}

/// Documents produced by one render call plus the issues met on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Rendered documents, in tree order
    pub documents: Vec<DocumentRecord>,
    /// Degraded or skipped commands
    pub issues: Vec<RenderError>,
}

impl RenderReport {
    /// Number of commands that were skipped entirely.
    pub fn skipped(&self) -> usize {
        self.issues.iter().filter(|issue| issue.is_skip()).count()
    }

    /// Merges another report into this one.
    pub fn extend(&mut self, other: RenderReport) {
        self.documents.extend(other.documents);
        self.issues.extend(other.issues);
    }
}
