//! Version-control backend and the two query stages built on it.
//!
//! - `command`: `GitCommand`, runs the `git` executable and parses its text
//! - `repository`: `Libgit2Backend`, the same queries answered in-process
//! - `history`: `resolve_history`, commits touching a path across all refs
//! - `changes`: `expand_commit` and `diff_for_path`

pub mod changes;
pub mod command;
#[cfg(test)]
pub mod fixture;
pub mod history;
pub mod repository;

pub use changes::{diff_for_path, expand_commit};
pub use command::GitCommand;
pub use history::resolve_history;
pub use repository::Libgit2Backend;

use crate::error::Result;
use crate::models::Commit;

/// Default separator between id, date and summary in detailed log output.
pub const DEFAULT_FIELD_SEPARATOR: char = '\u{1f}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryMode {
    /// Id, ISO date and summary for every commit
    #[default]
    Detailed,
    /// Ids only; timestamps absent and summaries empty
    IdsOnly,
}

/// The three queries the graph build needs from version control.
///
/// Implementations answer with the same shapes `git` prints: commits newest
/// first across every ref, plain path names, and raw unified diff lines.
pub trait VcsBackend {
    fn log(&self, target: &str, mode: HistoryMode) -> Result<Vec<Commit>>;

    fn changed_paths(&self, commit_id: &str) -> Result<Vec<String>>;

    fn diff(&self, commit_id: &str, path: &str) -> Result<Vec<String>>;
}
