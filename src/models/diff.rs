//! Per-path diff annotation.
//!
//! A `DiffFragment` keeps the raw added and removed lines of one
//! (commit, path) pair, with the backend's `+`/`-` prefixes intact.

use serde::{Deserialize, Serialize};

const ADDITION_MARKER: char = '+';
const REMOVAL_MARKER: char = '-';
const ADDITION_HEADER: &str = "+++";
const REMOVAL_HEADER: &str = "---";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFragment {
    pub additions: Vec<String>,
    pub removals: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    Addition,
    Removal,
    Other,
}

impl LineType {
    pub fn of(line: &str) -> Self {
        if line.starts_with(ADDITION_MARKER) && !line.starts_with(ADDITION_HEADER) {
            LineType::Addition
        } else if line.starts_with(REMOVAL_MARKER) && !line.starts_with(REMOVAL_HEADER) {
            LineType::Removal
        } else {
            LineType::Other
        }
    }
}

impl DiffFragment {
    /// Split raw unified diff lines into additions and removals.
    /// File headers, hunk headers and context lines are dropped.
    pub fn classify<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut fragment = DiffFragment::default();
        for line in lines {
            let line = line.as_ref();
            match LineType::of(line) {
                LineType::Addition => fragment.additions.push(line.to_string()),
                LineType::Removal => fragment.removals.push(line.to_string()),
                LineType::Other => {}
            }
        }
        fragment
    }

    pub fn added(&self) -> usize {
        self.additions.len()
    }

    pub fn removed(&self) -> usize {
        self.removals.len()
    }
}
