//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod git;
pub mod scripted;

pub use self::git::{
    create_bare_remote, create_dated_commit, create_test_commit, is_git_available,
    push_to_remote, setup_git_repo,
};
pub use self::scripted::{RepoScript, ScriptedGit};

use std::path::Path;

/// Creates a directory with an empty `.git` directory inside
pub fn make_metadata_dir(path: &Path) {
    std::fs::create_dir_all(path.join(".git")).expect("Failed to create .git directory");
}
