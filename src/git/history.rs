use tracing::debug;

use crate::diagnostics::{Diagnostic, DiagnosticLog};
use crate::git::{HistoryMode, VcsBackend};
use crate::models::Commit;

/// Commits touching `target` across every ref, newest first.
///
/// A failing backend is reported to `log` and yields an empty history; an
/// empty history is not reported here, the caller decides how to surface it.
pub fn resolve_history<B: VcsBackend + ?Sized>(
    backend: &B,
    target: &str,
    mode: HistoryMode,
    log: &mut DiagnosticLog,
) -> Vec<Commit> {
    match backend.log(target, mode) {
        Ok(commits) => {
            debug!("Resolved {} commits touching {}", commits.len(), target);
            commits
        }
        Err(e) => {
            log.report(Diagnostic::HistoryFailed {
                target: target.to_string(),
                error: e.to_string(),
            });
            Vec::new()
        }
    }
}
