//! Commit record produced by history queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Number of characters shown for abbreviated commit ids
pub const SHORT_ID_LEN: usize = 8;

/// One historical change in a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full object id
    pub id: String,
    /// First [`SHORT_ID_LEN`] characters of `id`, or all of it when shorter
    pub short_id: String,
    pub author: String,
    /// Author time, second resolution
    pub timestamp: DateTime<Utc>,
    pub message: String,
    /// Owning repository; empty until the scanner stamps it
    pub repository_path: PathBuf,
    /// Whether any remote-tracking ref contains this commit
    pub pushed: bool,
}

impl Commit {
    pub fn new(
        id: impl Into<String>,
        author: impl Into<String>,
        timestamp: DateTime<Utc>,
        message: impl Into<String>,
    ) -> Self {
        let id = id.into();
        let short_id = short_id(&id).to_string();
        Self {
            id,
            short_id,
            author: author.into(),
            timestamp,
            message: message.into(),
            repository_path: PathBuf::new(),
            pushed: false,
        }
    }

    /// Base name of the owning repository for display
    pub fn repository_name(&self) -> String {
        self.repository_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.repository_path.display().to_string())
    }
}

/// Returns the first [`SHORT_ID_LEN`] characters of `id`
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
