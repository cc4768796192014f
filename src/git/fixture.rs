//! Throwaway repositories shared by the backend tests.
//!
//! The base repository has two commits on the default branch:
//! - `first`: `example.txt`, `other.txt`
//! - `second`: `example.txt` (one line added), `src/lib.rs`, `файл.txt`

use git2::{Oid, Repository, Signature, Time};
use std::path::Path;
use tempfile::{TempDir, tempdir};

pub type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;
pub type FixtureResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

pub const ROOT_TIME: i64 = 1_700_000_000;

pub fn signature(seconds: i64) -> FixtureResult<Signature<'static>> {
    Ok(Signature::new("Test User", "test@example.com", &Time::new(seconds, 60))?)
}

/// Write `files` to the work tree, stage them and commit on HEAD.
pub fn commit_files(
    dir: &TempDir,
    repo: &Repository,
    files: &[(&str, &str)],
    message: &str,
    seconds: i64,
) -> FixtureResult<Oid> {
    let sig = signature(seconds)?;
    let mut index = repo.index()?;
    for (name, content) in files {
        let full = dir.path().join(name);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, content)?;
        index.add_path(Path::new(name))?;
    }
    index.write()?;
    let tree = repo.find_tree(index.write_tree()?)?;
    let parents = match repo.head() {
        Ok(head) => vec![head.peel_to_commit()?],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
    Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)?)
}

/// Commit top-level `files` on top of the first parent's tree without
/// touching the index or work tree. `update_ref` names the ref to move.
pub fn commit_tree(
    repo: &Repository,
    update_ref: &str,
    parents: &[Oid],
    files: &[(&str, &str)],
    message: &str,
    seconds: i64,
) -> FixtureResult<Oid> {
    let parents = parents
        .iter()
        .map(|oid| repo.find_commit(*oid))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let base = match parents.first() {
        Some(commit) => Some(commit.tree()?),
        None => None,
    };

    let mut builder = repo.treebuilder(base.as_ref())?;
    for (name, content) in files {
        let blob = repo.blob(content.as_bytes())?;
        builder.insert(name, blob, 0o100644)?;
    }
    let tree = repo.find_tree(builder.write()?)?;

    let sig = signature(seconds)?;
    let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();
    Ok(repo.commit(Some(update_ref), &sig, &sig, message, &tree, &parent_refs)?)
}

pub fn create_test_repo() -> FixtureResult<(TempDir, Repository, Oid, Oid)> {
    let dir = tempdir()?;
    let repo = Repository::init(dir.path())?;
    let first = commit_files(
        &dir,
        &repo,
        &[("example.txt", "one\n"), ("other.txt", "x\n")],
        "Initial commit",
        ROOT_TIME,
    )?;
    let second = commit_files(
        &dir,
        &repo,
        &[
            ("example.txt", "one\ntwo\n"),
            ("src/lib.rs", "fn main() {}\n"),
            ("файл.txt", "привет\n"),
        ],
        "Add second line",
        ROOT_TIME + 100,
    )?;
    Ok((dir, repo, first, second))
}

/// Base repository plus a `feature` branch commit and a merge back into the
/// default branch whose `example.txt` differs from both parents.
pub fn create_merged_repo() -> FixtureResult<(TempDir, Repository, Oid, Oid)> {
    let (dir, repo, _first, second) = create_test_repo()?;
    let side = commit_tree(
        &repo,
        "refs/heads/feature",
        &[second],
        &[("example.txt", "side\n")],
        "Side change",
        ROOT_TIME + 200,
    )?;
    let head_ref = {
        let head = repo.head()?;
        head.name().ok_or("HEAD is not a named ref")?.to_string()
    };
    let merge = commit_tree(
        &repo,
        &head_ref,
        &[second, side],
        &[("example.txt", "resolved\n")],
        "Merge branch 'feature'",
        ROOT_TIME + 300,
    )?;
    Ok((dir, repo, side, merge))
}
