use serde::{Deserialize, Serialize};

/// Number of hex digits shown for a commit in node labels.
pub const SHORT_ID_LEN: usize = 7;

/// A commit discovered while resolving the history of a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// Full object id as printed by the backend
    pub id: String,
    /// ISO-8601 author date, absent in ids-only mode
    pub timestamp: Option<String>,
    /// First line of the commit message, empty in ids-only mode
    pub summary: String,
}

impl Commit {
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: None,
            summary: String::new(),
        }
    }

    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(SHORT_ID_LEN) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }
}
