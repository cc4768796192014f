//! User-facing diagnostics collected during a graph build.
//!
//! Backend failures and empty results are not errors for the build; they are
//! recorded here, logged through `tracing`, and printed by `main` at the end.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The history query succeeded but no commit touched the target.
    NoHistory { target: String },
    /// The history query itself failed.
    HistoryFailed { target: String, error: String },
    /// Listing the changed paths of one commit failed.
    ChangesFailed { commit: String, error: String },
    /// Fetching the diff of one path in one commit failed.
    DiffFailed { commit: String, path: String, error: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NoHistory { target } => {
                write!(f, "File '{}' was not found in the commit history", target)
            }
            Diagnostic::HistoryFailed { target, error } => {
                write!(f, "Failed to read commit history for '{}': {}", target, error)
            }
            Diagnostic::ChangesFailed { commit, error } => {
                write!(f, "Failed to list changes for commit {}: {}", commit, error)
            }
            Diagnostic::DiffFailed { commit, path, error } => {
                write!(f, "Failed to read diff of '{}' in commit {}: {}", path, commit, error)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
