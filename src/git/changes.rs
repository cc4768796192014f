use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::git::VcsBackend;

/// Every path changed by `commit_id`, not only the one history was resolved
/// for. Failures are reported and yield no paths for this commit.
pub fn expand_commit<B: VcsBackend + ?Sized>(backend: &B, commit_id: &str, log: &mut DiagnosticLog) -> Vec<String> {
    match backend.changed_paths(commit_id) {
        Ok(paths) => {
            debug!("Commit {} changed {} paths", commit_id, paths.len());
            paths
        }
        Err(e) => {
            log.report(Diagnostic::ChangesFailed {
                commit: commit_id.to_string(),
                error: e.to_string(),
            });
            Vec::new()
        }
    }
}

/// Raw unified diff lines of `path` within `commit_id`.
pub fn diff_for_path<B: VcsBackend + ?Sized>(
    backend: &B,
    commit_id: &str,
    path: &str,
    log: &mut DiagnosticLog,
) -> Vec<String> {
    match backend.diff(commit_id, path) {
        Ok(lines) => lines,
        Err(e) => {
            log.report(Diagnostic::DiffFailed {
                commit: commit_id.to_string(),
                path: path.to_string(),
                error: e.to_string(),
            });
            Vec::new()
        }
    }
}
