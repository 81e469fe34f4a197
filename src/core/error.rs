//! Scan error taxonomy
//!
//! Record-level parse problems and indeterminate push status never surface
//! here; they are logged and recovered where they happen.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::git::GitError;

/// A history query that failed for one repository
#[derive(Error, Debug)]
#[error("error scanning repo {}: {source}", .path.display())]
pub struct RepoScanError {
    pub path: PathBuf,
    #[source]
    pub source: GitError,
}

/// Errors that abort a whole scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("failed to read directory {}: {source}", .path.display())]
    Discovery {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no git repositories found in {}", .0.display())]
    NoRepositories(PathBuf),

    #[error("{}", summarize_failures(.0))]
    Query(Vec<RepoScanError>),

    #[error("scan cancelled")]
    Cancelled,
}

impl ScanError {
    /// Per-repository failures carried by a [`ScanError::Query`]
    pub fn failures(&self) -> &[RepoScanError] {
        match self {
            ScanError::Query(failures) => failures,
            _ => &[],
        }
    }
}

fn summarize_failures(failures: &[RepoScanError]) -> String {
    match failures {
        [] => "repository scan failed".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{first} (and {} more failed repositories)", rest.len()),
    }
}
