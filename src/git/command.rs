use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{BackendError, Result};
use crate::git::{DEFAULT_FIELD_SEPARATOR, HistoryMode, VcsBackend};
use crate::models::Commit;
use crate::process::ToolPath;

/// Backend that shells out to the `git` executable.
pub struct GitCommand {
    repo: PathBuf,
    program: String,
    tools: ToolPath,
    field_separator: char,
}

impl GitCommand {
    pub fn new<P: AsRef<Path>>(repo: P) -> Self {
        Self {
            repo: repo.as_ref().to_path_buf(),
            program: "git".to_string(),
            tools: ToolPath::default(),
            field_separator: DEFAULT_FIELD_SEPARATOR,
        }
    }

    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_tool_path(mut self, tools: ToolPath) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_field_separator(mut self, separator: char) -> Self {
        self.field_separator = separator;
        self
    }

    pub fn log_args(&self, target: &str, mode: HistoryMode) -> Vec<String> {
        let format = match mode {
            HistoryMode::Detailed => {
                let sep = self.field_separator;
                format!("--pretty=format:%H{sep}%ad{sep}%s")
            }
            HistoryMode::IdsOnly => "--pretty=format:%H".to_string(),
        };
        vec![
            "log".to_string(),
            format,
            "--date=iso".to_string(),
            "--all".to_string(),
            "--".to_string(),
            literal_pathspec(target),
        ]
    }

    fn run(&self, args: &[String]) -> Result<String> {
        let command_line = format!("{} {}", self.program, args.join(" "));
        debug!("Running {}", command_line);

        let mut command = self.tools.command(&self.program).map_err(|e| BackendError::Spawn {
            program: self.program.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e),
        })?;
        // Paths are printed as raw UTF-8 instead of C-quoted octal escapes
        let output = command
            .arg("-C")
            .arg(&self.repo)
            .args(["-c", "core.quotePath=false"])
            .args(args)
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Exit {
                command: command_line,
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| BackendError::InvalidUtf8(command_line))
    }
}

impl VcsBackend for GitCommand {
    fn log(&self, target: &str, mode: HistoryMode) -> Result<Vec<Commit>> {
        let stdout = self.run(&self.log_args(target, mode))?;
        Ok(parse_log(&stdout, mode, self.field_separator))
    }

    fn changed_paths(&self, commit_id: &str) -> Result<Vec<String>> {
        let args = [
            "show".to_string(),
            "--pretty=format:".to_string(),
            "--name-only".to_string(),
            "-z".to_string(),
            commit_id.to_string(),
        ];
        let stdout = self.run(&args)?;
        Ok(parse_name_list(&stdout))
    }

    fn diff(&self, commit_id: &str, path: &str) -> Result<Vec<String>> {
        // `show` handles root commits; merges are diffed against the first parent.
        let args = [
            "show".to_string(),
            "--pretty=format:".to_string(),
            "--no-color".to_string(),
            "--no-ext-diff".to_string(),
            "--diff-merges=first-parent".to_string(),
            commit_id.to_string(),
            "--".to_string(),
            literal_pathspec(path),
        ];
        let stdout = self.run(&args)?;
        Ok(stdout.trim().lines().map(str::to_string).collect())
    }
}

pub fn parse_log(stdout: &str, mode: HistoryMode, separator: char) -> Vec<Commit> {
    stdout
        .lines()
        .filter_map(|line| parse_log_line(line, mode, separator))
        .collect()
}

fn parse_log_line(line: &str, mode: HistoryMode, separator: char) -> Option<Commit> {
    let line = line.trim_end_matches('\r');
    if line.trim().is_empty() {
        return None;
    }
    match mode {
        HistoryMode::IdsOnly => Some(Commit::from_id(line.trim())),
        HistoryMode::Detailed => {
            let mut fields = line.splitn(3, separator);
            let id = fields.next()?.trim().to_string();
            let timestamp = fields.next().map(str::to_string).filter(|t| !t.is_empty());
            let summary = fields.next().unwrap_or("").to_string();
            Some(Commit {
                id,
                timestamp,
                summary,
            })
        }
    }
}

/// Split NUL-terminated `--name-only -z` output. The empty commit header
/// leaves a newline in front of the first name.
pub fn parse_name_list(stdout: &str) -> Vec<String> {
    stdout
        .split('\0')
        .map(|name| name.trim_start_matches('\n'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Pathspec that matches `path` exactly, with no glob or magic expansion.
fn literal_pathspec(path: &str) -> String {
    format!(":(literal){path}")
}
