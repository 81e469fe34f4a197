//! Repository handle: history queries and push status for one repository

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::commit::Commit;
use super::operations::{GitError, GitRunner};
use super::parser::{parse_log_output, LOG_FORMAT};
use crate::core::config::PUSH_STATUS_CONCURRENCY;

/// Which commit universe a history query targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    /// Every commit reachable from any ref
    #[default]
    All,
    /// Reachable from HEAD but from no remote-tracking ref
    UnpushedOnly,
    /// Reachable from a remote-tracking ref
    PushedOnly,
}

impl Scope {
    /// Revision arguments handed to `git log`
    pub fn revision_args(self) -> &'static [&'static str] {
        match self {
            Scope::All => &["--all"],
            Scope::UnpushedOnly => &["HEAD", "--not", "--remotes"],
            Scope::PushedOnly => &["--remotes"],
        }
    }

    /// Whether a commit with the given push status belongs to this scope
    pub fn accepts(self, pushed: bool) -> bool {
        match self {
            Scope::All => true,
            Scope::UnpushedOnly => !pushed,
            Scope::PushedOnly => pushed,
        }
    }
}

/// Handle on a single repository working tree
#[derive(Clone)]
pub struct Repo {
    path: PathBuf,
    runner: Arc<dyn GitRunner>,
}

impl Repo {
    pub fn new(path: impl Into<PathBuf>, runner: Arc<dyn GitRunner>) -> Self {
        Self {
            path: path.into(),
            runner,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn git(&self, args: &[&str]) -> Result<super::GitOutput, GitError> {
        let args: Vec<String> = args.iter().map(|arg| (*arg).to_string()).collect();
        self.runner.run(&self.path, &args).await
    }

    /// Lists commits in `scope` authored on or after `since`, with push status attached
    pub async fn list_commits(
        &self,
        since: &DateTime<FixedOffset>,
        scope: Scope,
    ) -> Result<Vec<Commit>, GitError> {
        if scope == Scope::UnpushedOnly && !self.has_head().await? {
            tracing::debug!(repo = %self.path.display(), "HEAD does not resolve, nothing unpushed");
            return Ok(Vec::new());
        }

        let mut commits = self.get_commits(scope.revision_args(), since).await?;
        self.attach_push_status(&mut commits).await;
        Ok(commits)
    }

    /// Runs `git log` for the given revisions and parses the output
    pub async fn get_commits(
        &self,
        revisions: &[&str],
        since: &DateTime<FixedOffset>,
    ) -> Result<Vec<Commit>, GitError> {
        // git has no history before the epoch
        let floor = DateTime::<Utc>::UNIX_EPOCH.fixed_offset();
        let since = if *since < floor { floor } else { *since };
        let since_arg = format!(
            "--since={}",
            since.to_rfc3339_opts(SecondsFormat::Secs, false)
        );
        let mut args = vec!["log", LOG_FORMAT, since_arg.as_str()];
        args.extend_from_slice(revisions);

        let stdout = self.git(&args).await?.into_stdout()?;
        Ok(parse_log_output(&stdout))
    }

    /// Whether any remote-tracking branch contains `id`.
    ///
    /// Query failures and empty output both count as not pushed.
    pub async fn is_commit_pushed(&self, id: &str) -> bool {
        match self.git(&["branch", "-r", "--contains", id]).await {
            Ok(output) if output.success => !output.stdout.trim().is_empty(),
            Ok(output) => {
                tracing::debug!(
                    repo = %self.path.display(),
                    commit = id,
                    "push status indeterminate: {}",
                    output.stderr
                );
                false
            }
            Err(e) => {
                tracing::debug!(repo = %self.path.display(), commit = id, "push status indeterminate: {e}");
                false
            }
        }
    }

    // TODO: resolve push status with one `for-each-ref --contains` sweep per
    // repository instead of a `branch -r --contains` call per commit.
    async fn attach_push_status(&self, commits: &mut [Commit]) {
        let statuses: Vec<bool> = stream::iter(commits.iter())
            .map(|commit| self.is_commit_pushed(&commit.id))
            .buffered(PUSH_STATUS_CONCURRENCY)
            .collect()
            .await;

        for (commit, pushed) in commits.iter_mut().zip(statuses) {
            commit.pushed = pushed;
        }
    }

    /// Whether `HEAD` resolves; a non-zero exit means an unborn branch
    async fn has_head(&self) -> Result<bool, GitError> {
        let output = self.git(&["rev-parse", "--verify", "--quiet", "HEAD"]).await?;
        Ok(output.success)
    }
}
