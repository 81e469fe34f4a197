//! Repository discovery
//!
//! Discovery runs in two passes. The filesystem pass collects directories
//! carrying git metadata; the confirmation pass asks git whether each one is
//! really the top of a working tree, which weeds out stale or partial
//! `.git` directories.

use dashmap::DashSet;
use futures::stream::{self, StreamExt};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::config::{
    DISCOVERY_CONFIRM_CONCURRENCY, ESTIMATED_REPO_COUNT, GIT_METADATA_DIR, SKIP_DIRECTORIES,
};
use super::error::ScanError;
use crate::git::GitRunner;

/// How far below the root repositories are looked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoveryMode {
    /// The root itself and its immediate child directories
    #[default]
    Shallow,
    /// The whole subtree; a repository claims everything beneath it
    Recursive { max_depth: usize },
}

/// Check if a .git file (for submodules/worktrees) contains gitdir reference
/// Only reads the first 5 lines for efficiency
fn is_git_file(path: &Path) -> bool {
    match fs::File::open(path) {
        Ok(file) => BufReader::new(file)
            .lines()
            .take(5)
            .map_while(Result::ok)
            .any(|line| line.trim_start().starts_with("gitdir:")),
        Err(_) => false,
    }
}

/// Whether `dir` holds a `.git` directory or a `.git` file pointing at one
pub fn has_git_metadata(dir: &Path) -> bool {
    let marker = dir.join(GIT_METADATA_DIR);
    match fs::metadata(&marker) {
        Ok(meta) if meta.is_dir() => true,
        Ok(meta) if meta.is_file() => is_git_file(&marker),
        _ => false,
    }
}

/// Filesystem pass: directories under `root` that look like repositories
///
/// Shallow results list the root first, then children by name. Recursive
/// results are sorted by path.
pub fn find_candidates(root: &Path, mode: DiscoveryMode) -> io::Result<Vec<PathBuf>> {
    match mode {
        DiscoveryMode::Shallow => find_shallow(root),
        DiscoveryMode::Recursive { max_depth } => Ok(find_recursive(root, max_depth)),
    }
}

fn find_shallow(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    if has_git_metadata(root) {
        candidates.push(root.to_path_buf());
    }

    let mut children: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && has_git_metadata(path))
        .collect();
    children.sort();

    candidates.extend(children);
    Ok(candidates)
}

/// Walks the subtree in parallel, never descending into a claimed repository
fn find_recursive(root: &Path, max_depth: usize) -> Vec<PathBuf> {
    // A repository at the root claims the whole subtree
    if has_git_metadata(root) {
        return vec![root.to_path_buf()];
    }
    walk_beneath(root, max_depth)
}

/// Candidates strictly below `dir`, at most `max_depth` levels down
fn walk_beneath(dir: &Path, max_depth: usize) -> Vec<PathBuf> {
    if max_depth == 0 {
        return Vec::new();
    }

    let found = Arc::new(DashSet::with_capacity(ESTIMATED_REPO_COUNT));
    let found_clone = Arc::clone(&found);

    let walker = WalkBuilder::new(dir)
        .standard_filters(false) // ignore files must not hide repositories
        .follow_links(true)
        .max_depth(Some(max_depth))
        .threads(num_cpus::get().min(8))
        .filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                return false;
            }

            let file_name = entry.file_name().to_str().unwrap_or("");
            if file_name.starts_with('.') || SKIP_DIRECTORIES.contains(&file_name) {
                return false;
            }

            if has_git_metadata(entry.path()) {
                found_clone.insert(entry.path().to_path_buf());
                return false;
            }

            true
        })
        .build_parallel();

    walker.run(|| Box::new(|_| ignore::WalkState::Continue));

    let mut repos: Vec<PathBuf> = Arc::try_unwrap(found)
        .map(|set| set.into_iter().collect())
        .unwrap_or_else(|set| set.iter().map(|path| path.key().clone()).collect());

    repos.par_sort();
    repos
}

/// Confirms that git treats `candidate` as the top of a working tree.
///
/// Returns the canonical repository path on success.
pub async fn confirm_repository(candidate: &Path, runner: &dyn GitRunner) -> Option<PathBuf> {
    let canonical = tokio::fs::canonicalize(candidate).await.ok()?;
    let args = ["rev-parse".to_string(), "--show-toplevel".to_string()];

    let toplevel = match runner.run(&canonical, &args).await {
        Ok(output) if output.success => output.stdout.trim().to_string(),
        Ok(output) => {
            tracing::debug!(path = %canonical.display(), "rejected git metadata: {}", output.stderr);
            return None;
        }
        Err(e) => {
            tracing::debug!(path = %canonical.display(), "rejected git metadata: {e}");
            return None;
        }
    };

    let toplevel = tokio::fs::canonicalize(&toplevel).await.ok()?;
    if toplevel == canonical {
        tracing::debug!(path = %canonical.display(), "found git repository");
        Some(canonical)
    } else {
        tracing::debug!(
            path = %canonical.display(),
            toplevel = %toplevel.display(),
            "git metadata belongs to an enclosing work tree"
        );
        None
    }
}

/// Finds confirmed repository roots under `root`.
///
/// An empty result is reported as [`ScanError::NoRepositories`].
pub async fn discover(
    root: &Path,
    mode: DiscoveryMode,
    runner: Arc<dyn GitRunner>,
) -> Result<Vec<PathBuf>, ScanError> {
    let discovery_error = |source: io::Error| ScanError::Discovery {
        path: root.to_path_buf(),
        source,
    };

    let root = tokio::fs::canonicalize(root).await.map_err(discovery_error)?;
    tracing::info!(root = %root.display(), ?mode, "scanning for git repositories");

    let walk_root = root.clone();
    let candidates = tokio::task::spawn_blocking(move || find_candidates(&walk_root, mode))
        .await
        .map_err(|e| discovery_error(io::Error::other(e)))?
        .map_err(discovery_error)?;

    let mut repos = Vec::new();
    let mut pending = candidates;
    while !pending.is_empty() {
        let confirmed: Vec<Option<PathBuf>> = stream::iter(pending.iter())
            .map(|candidate| confirm_repository(candidate, runner.as_ref()))
            .buffered(DISCOVERY_CONFIRM_CONCURRENCY)
            .collect()
            .await;

        let mut rejected = Vec::new();
        for (candidate, result) in pending.into_iter().zip(confirmed) {
            match result {
                Some(repo) => repos.push(repo),
                None => rejected.push(candidate),
            }
        }

        // Stale metadata claims nothing; look beneath it again
        pending = match mode {
            DiscoveryMode::Recursive { max_depth } if !rejected.is_empty() => {
                let walk_root = root.clone();
                tokio::task::spawn_blocking(move || {
                    rejected
                        .iter()
                        .flat_map(|dir| {
                            let depth = dir
                                .strip_prefix(&walk_root)
                                .map(|rel| rel.components().count())
                                .unwrap_or(max_depth);
                            walk_beneath(dir, max_depth.saturating_sub(depth))
                        })
                        .collect::<Vec<PathBuf>>()
                })
                .await
                .map_err(|e| discovery_error(io::Error::other(e)))?
            }
            _ => Vec::new(),
        };
    }

    if matches!(mode, DiscoveryMode::Recursive { .. }) {
        repos.par_sort();
    }

    // Symlinked paths can resolve to the same repository
    let mut seen = HashSet::new();
    repos.retain(|path| seen.insert(path.clone()));

    if repos.is_empty() {
        return Err(ScanError::NoRepositories(root));
    }

    tracing::info!(count = repos.len(), "found git repositories");
    Ok(repos)
}
