//! Scoped executable search path for child processes.
//!
//! `ToolPath` holds directories that should be searched before the inherited
//! `PATH` when spawning `git` or `dot`. It only ever touches the `Command`
//! it is applied to; the environment of this process is left alone.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

#[derive(Debug, Clone, Default)]
pub struct ToolPath {
    dirs: Vec<PathBuf>,
}

impl ToolPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// `PATH` value for a child: our directories first, then `inherited`.
    pub fn joined(&self, inherited: Option<OsString>) -> Result<OsString, std::env::JoinPathsError> {
        let mut all = self.dirs.clone();
        if let Some(inherited) = inherited {
            all.extend(std::env::split_paths(&inherited));
        }
        std::env::join_paths(all)
    }

    /// Build a `Command` for `program` whose `PATH` is prefixed with the
    /// configured directories.
    pub fn command(&self, program: &str) -> Result<Command, std::env::JoinPathsError> {
        let mut command = Command::new(program);
        if !self.is_empty() {
            let path = self.joined(std::env::var_os("PATH"))?;
            command.env("PATH", path);
        }
        Ok(command)
    }
}
