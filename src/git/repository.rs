use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{DiffFormat, DiffOptions, Oid, Repository, Sort};
use std::path::Path;
use tracing::debug;

use crate::error::{BackendError, Result};
use crate::git::{HistoryMode, VcsBackend};
use crate::models::Commit;

/// In-process backend over libgit2. Answers the same queries as
/// `GitCommand` without spawning `git`.
pub struct Libgit2Backend {
    repo: Repository,
}

impl Libgit2Backend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();
        let repo = Repository::discover(&path).map_err(|_| BackendError::RepoNotFound(path_str))?;
        debug!("Opened git repository at {:?}", repo.path());

        Ok(Self { repo })
    }

    fn find_commit(&self, commit_id: &str) -> Result<git2::Commit<'_>> {
        let oid = Oid::from_str(commit_id).map_err(|_| BackendError::CommitNotFound(commit_id.to_string()))?;
        self.repo
            .find_commit(oid)
            .map_err(|_| BackendError::CommitNotFound(commit_id.to_string()))
    }

    /// Tree diff of `commit` against `parent` (the empty tree when `None`),
    /// optionally limited to the exact path `pathspec`.
    fn diff_against(
        &self,
        commit: &git2::Commit<'_>,
        parent: Option<&git2::Commit<'_>>,
        pathspec: Option<&str>,
    ) -> Result<git2::Diff<'_>> {
        let tree = commit.tree()?;
        let parent_tree = match parent {
            Some(parent) => Some(parent.tree()?),
            None => None,
        };

        let mut opts = DiffOptions::new();
        if let Some(p) = pathspec {
            // Match the name as written; `*`, `?` and `[` are not globs here
            opts.pathspec(p).disable_pathspec_match(true);
        }

        Ok(self.repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), Some(&mut opts))?)
    }

    /// Paths that differ from every parent, in first-parent diff order.
    ///
    /// For a single parent (or a root commit) this is the plain tree diff. For
    /// a merge it is what `git show --name-only` prints: only paths the merge
    /// changed relative to all parents, so a clean merge lists nothing and a
    /// conflict resolution lists the resolved files.
    fn touched_paths(
        &self,
        commit: &git2::Commit<'_>,
        pathspec: Option<&str>,
    ) -> Result<Vec<String>> {
        let mut parents = commit.parents();
        let first = parents.next();
        let mut touched = delta_paths(&self.diff_against(commit, first.as_ref(), pathspec)?);

        for parent in parents {
            if touched.is_empty() {
                break;
            }
            let other = delta_paths(&self.diff_against(commit, Some(&parent), pathspec)?);
            touched.retain(|path| other.contains(path));
        }

        Ok(touched)
    }
}

impl VcsBackend for Libgit2Backend {
    fn log(&self, target: &str, mode: HistoryMode) -> Result<Vec<Commit>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME)?;
        revwalk.push_glob("*")?;
        // Detached HEAD is not under refs/
        if self.repo.head_detached().unwrap_or(false) {
            revwalk.push_head()?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;

            // Merges count only when the target differs from every parent
            if self.touched_paths(&commit, Some(target))?.is_empty() {
                continue;
            }

            commits.push(commit_to_model(&commit, mode));
        }

        Ok(commits)
    }

    fn changed_paths(&self, commit_id: &str) -> Result<Vec<String>> {
        let commit = self.find_commit(commit_id)?;
        self.touched_paths(&commit, None)
    }

    fn diff(&self, commit_id: &str, path: &str) -> Result<Vec<String>> {
        let commit = self.find_commit(commit_id)?;
        let first_parent = if commit.parent_count() > 0 {
            Some(commit.parent(0)?)
        } else {
            None
        };
        let diff = self.diff_against(&commit, first_parent.as_ref(), Some(path))?;

        let mut text = String::new();
        diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
            if matches!(line.origin(), '+' | '-' | ' ') {
                text.push(line.origin());
            }
            text.push_str(&String::from_utf8_lossy(line.content()));
            true
        })?;

        Ok(text.trim().lines().map(str::to_string).collect())
    }
}

fn delta_paths(diff: &git2::Diff<'_>) -> Vec<String> {
    diff.deltas()
        .filter_map(|delta| {
            delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().to_string())
        })
        .collect()
}

pub fn commit_to_model(commit: &git2::Commit<'_>, mode: HistoryMode) -> Commit {
    let id = commit.id().to_string();
    match mode {
        HistoryMode::IdsOnly => Commit::from_id(id),
        HistoryMode::Detailed => Commit {
            id,
            timestamp: Some(format_iso_time(&commit.author().when())),
            summary: commit.summary().unwrap_or("").to_string(),
        },
    }
}

/// Same shape as `git log --date=iso`: `2024-03-01 10:00:00 +0100`.
pub fn format_iso_time(time: &git2::Time) -> String {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)
        .unwrap_or_else(|| Utc.fix());
    match DateTime::from_timestamp(time.seconds(), 0) {
        Some(utc) => utc.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S %z").to_string(),
        None => "1970-01-01 00:00:00 +0000".to_string(),
    }
}
