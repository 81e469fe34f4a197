//! Git testing utilities

use anyhow::Result;
use std::path::Path;
use std::process::Command;

fn git(path: &Path, args: &[&str]) -> Result<()> {
    let output = Command::new("git").args(args).current_dir(path).output()?;
    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

/// Sets up a git repository with user config
pub fn setup_git_repo(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    git(path, &["init", "-q"])?;
    git(path, &["config", "user.name", "Test User"])?;
    git(path, &["config", "user.email", "test@example.com"])?;
    // Disable commit signing for tests
    git(path, &["config", "commit.gpgsign", "false"])?;
    Ok(())
}

/// Creates a test commit in the repository dated now
pub fn create_test_commit(path: &Path, file_name: &str, content: &str, message: &str) -> Result<()> {
    create_dated_commit(path, file_name, content, message, chrono::Utc::now().timestamp())
}

/// Creates a test commit whose author and committer dates are `timestamp`
pub fn create_dated_commit(
    path: &Path,
    file_name: &str,
    content: &str,
    message: &str,
    timestamp: i64,
) -> Result<()> {
    std::fs::write(path.join(file_name), content)?;
    git(path, &["add", file_name])?;

    let date = format!("@{timestamp} +0000");
    let output = Command::new("git")
        .args(["commit", "-q", "-m", message])
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .current_dir(path)
        .output()?;

    if !output.status.success() {
        anyhow::bail!(
            "Failed to create commit: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(())
}

/// Creates a bare repository to act as a remote
pub fn create_bare_remote(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    git(path, &["init", "-q", "--bare"])
}

/// Adds `remote` as `origin` and pushes the current branch to it
pub fn push_to_remote(path: &Path, remote: &Path) -> Result<()> {
    let remote = remote.to_string_lossy();
    git(path, &["remote", "add", "origin", &remote])?;
    git(path, &["push", "-q", "-u", "origin", "HEAD"])
}

/// Checks if git is available in the system
pub fn is_git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}
