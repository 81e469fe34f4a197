//! Basic git command execution
//!
//! Every git invocation goes through the [`GitRunner`] trait so the
//! repository handle and the scan coordinator can be driven by scripted
//! runners in tests. [`SystemGit`] is the real implementation backed by
//! `tokio::process`.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

use crate::core::config::GIT_OPERATION_TIMEOUT_SECS;

const GIT_COMMAND: &str = "git";

/// Errors that can occur when executing git commands
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git is not installed or not in PATH")]
    GitNotFound,

    #[error("git command failed (exit code {exit_code}): {stderr}")]
    CommandFailed { stderr: String, exit_code: i32 },

    #[error("git operation timed out after {0} seconds")]
    TimedOut(u64),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Captured result of one git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Converts a non-zero exit into [`GitError::CommandFailed`]
    pub fn into_stdout(self) -> Result<String, GitError> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(GitError::CommandFailed {
                stderr: self.stderr,
                exit_code: self.exit_code,
            })
        }
    }
}

/// Runs git subcommands inside a repository directory
#[async_trait]
pub trait GitRunner: Send + Sync {
    /// Runs `git <args>` with `path` as the working directory.
    ///
    /// A non-zero exit is not an error at this level; it is reported through
    /// [`GitOutput::success`]. Only spawn failures and timeouts are errors.
    async fn run(&self, path: &Path, args: &[String]) -> Result<GitOutput, GitError>;
}

/// Runs the system `git` binary with a per-invocation timeout
#[derive(Debug, Clone)]
pub struct SystemGit {
    timeout: Duration,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new(Duration::from_secs(GIT_OPERATION_TIMEOUT_SECS))
    }
}

impl SystemGit {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl GitRunner for SystemGit {
    async fn run(&self, path: &Path, args: &[String]) -> Result<GitOutput, GitError> {
        // kill_on_drop makes a cancelled scan take its child processes down with it
        let child = Command::new(GIT_COMMAND)
            .args(args)
            .current_dir(path)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => return Err(GitError::GitNotFound),
            Ok(Err(e)) => return Err(GitError::Io(e)),
            Err(_) => return Err(GitError::TimedOut(self.timeout.as_secs())),
        };

        Ok(GitOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_stdout_maps_failure() {
        let err = GitOutput::failed(128, "fatal: bad revision")
            .into_stdout()
            .unwrap_err();
        match err {
            GitError::CommandFailed { stderr, exit_code } => {
                assert_eq!(exit_code, 128);
                assert_eq!(stderr, "fatal: bad revision");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_into_stdout_passes_success() {
        assert_eq!(GitOutput::ok("abc").into_stdout().unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_system_git_reports_non_repository() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        let git = SystemGit::default();
        let args = vec!["rev-parse".to_string(), "--show-toplevel".to_string()];

        match git.run(temp_dir.path(), &args).await {
            Ok(output) => assert!(!output.success, "temp dir should not be a work tree"),
            Err(GitError::GitNotFound) => eprintln!("Git not available, skipping test"),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
}
