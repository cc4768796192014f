//! Error types for backend queries and graph rendering.
//!
//! - `BackendError`: a version-control query failed (non-zero exit, missing
//!   executable, unreadable repository, non-UTF-8 output)
//! - `RenderError`: the rendering collaborator could not produce an image
//!
//! Backend errors never escape the graph build; they are turned into
//! diagnostics at the call site. Render errors surface to `main`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Commit not found: {0}")]
    CommitNotFound(String),

    #[error("Output of `{0}` is not valid UTF-8")]
    InvalidUtf8(String),
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Invalid tool search path: {0}")]
    SearchPath(String),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BackendError>;
