//! Concurrent scan coordinator
//!
//! One future per discovered repository runs under a semaphore that caps how
//! many git subprocesses are alive at once. Commits and failures flow into
//! two unbounded channels so no repository ever waits on another while
//! emitting; both are drained only after every repository has finished.

use chrono::{DateTime, Local};
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Semaphore};

use super::discovery::{discover, DiscoveryMode};
use super::error::{RepoScanError, ScanError};
use super::window::{compute_since, ScanOptions};
use crate::git::{Commit, GitRunner, Repo, Scope, SystemGit};

impl ScanOptions {
    /// Query scope, `unpushed_only` taking precedence over `pushed_only`
    pub fn scope(&self) -> Scope {
        if self.unpushed_only {
            Scope::UnpushedOnly
        } else if self.pushed_only {
            Scope::PushedOnly
        } else {
            Scope::All
        }
    }
}

/// Outcome of a scan that tolerates per-repository failures
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Accepted commits, newest first
    pub commits: Vec<Commit>,
    /// Repositories whose history query failed
    pub failures: Vec<RepoScanError>,
    /// Number of repositories scanned
    pub repositories: usize,
}

/// Scans every repository under a root directory
pub struct Scanner {
    root: PathBuf,
    discovery: DiscoveryMode,
    concurrency: usize,
    runner: Arc<dyn GitRunner>,
    progress: Option<ProgressBar>,
    cancel: Option<watch::Receiver<bool>>,
}

impl Scanner {
    /// Creates a scanner using the system `git` with default limits
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            discovery: DiscoveryMode::default(),
            concurrency: crate::core::config::GIT_CONCURRENT_CAP,
            runner: Arc::new(SystemGit::default()),
            progress: None,
            cancel: None,
        }
    }

    pub fn with_discovery(mut self, discovery: DiscoveryMode) -> Self {
        self.discovery = discovery;
        self
    }

    /// Caps concurrently scanned repositories (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_runner(mut self, runner: Arc<dyn GitRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Ticks `progress` once per finished repository
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Aborts the scan once `true` is sent on the channel
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans all repositories; any failed repository fails the whole scan
    pub async fn scan(&self, options: &ScanOptions) -> Result<Vec<Commit>, ScanError> {
        let report = self.scan_report(options).await?;
        if report.failures.is_empty() {
            Ok(report.commits)
        } else {
            Err(ScanError::Query(report.failures))
        }
    }

    /// Scans all repositories, keeping results from those that succeeded
    pub async fn scan_report(&self, options: &ScanOptions) -> Result<ScanReport, ScanError> {
        self.scan_report_at(options, Local::now()).await
    }

    /// Like [`Scanner::scan_report`] with an explicit clock reading
    pub async fn scan_report_at(
        &self,
        options: &ScanOptions,
        now: DateTime<Local>,
    ) -> Result<ScanReport, ScanError> {
        let repos = self
            .until_cancelled(discover(&self.root, self.discovery, Arc::clone(&self.runner)))
            .await??;

        let since = compute_since(options, &now);
        tracing::info!(since = %since, repos = repos.len(), "scanning repositories");

        if let Some(progress) = &self.progress {
            progress.set_length(repos.len() as u64);
        }

        let repositories = repos.len();
        let (commits, failures) = self
            .until_cancelled(self.collect(repos, since, options.scope()))
            .await?;

        let mut commits = filter_commits(commits, options.scope());
        sort_commits(&mut commits);

        tracing::info!(
            commits = commits.len(),
            failed = failures.len(),
            "scan finished"
        );

        Ok(ScanReport {
            commits,
            failures,
            repositories,
        })
    }

    /// Runs one query per repository and drains both sinks after all complete
    async fn collect(
        &self,
        repos: Vec<PathBuf>,
        since: DateTime<Local>,
        scope: Scope,
    ) -> (Vec<Commit>, Vec<RepoScanError>) {
        let (commit_tx, mut commit_rx) = mpsc::unbounded_channel::<Commit>();
        let (error_tx, mut error_rx) = mpsc::unbounded_channel::<RepoScanError>();
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let since = since.fixed_offset();

        let mut futures = FuturesUnordered::new();
        for path in repos {
            let repo = Repo::new(path.clone(), Arc::clone(&self.runner));
            let semaphore = Arc::clone(&semaphore);
            let commit_tx = commit_tx.clone();
            let error_tx = error_tx.clone();
            let progress = self.progress.clone();

            futures.push(async move {
                // The semaphore is never closed, so acquire cannot fail
                let _permit = semaphore.acquire_owned().await.ok();

                match repo.list_commits(&since, scope).await {
                    Ok(commits) => {
                        for mut commit in commits {
                            commit.repository_path = path.clone();
                            let _ = commit_tx.send(commit);
                        }
                    }
                    Err(source) => {
                        tracing::warn!(repo = %path.display(), "history query failed: {source}");
                        let _ = error_tx.send(RepoScanError { path, source });
                    }
                }

                if let Some(progress) = progress {
                    progress.inc(1);
                }
            });
        }
        drop(commit_tx);
        drop(error_tx);

        // Wait for every repository before reading either sink
        while futures.next().await.is_some() {}

        let mut commits = Vec::new();
        while let Some(commit) = commit_rx.recv().await {
            commits.push(commit);
        }

        let mut failures = Vec::new();
        while let Some(failure) = error_rx.recv().await {
            failures.push(failure);
        }

        (commits, failures)
    }

    /// Races `work` against the cancellation signal.
    ///
    /// Dropping the losing future drops any in-flight git children, which
    /// are spawned with `kill_on_drop`.
    async fn until_cancelled<T>(&self, work: impl std::future::Future<Output = T>) -> Result<T, ScanError> {
        let Some(mut cancel) = self.cancel.clone() else {
            return Ok(work.await);
        };

        if *cancel.borrow() {
            return Err(ScanError::Cancelled);
        }

        tokio::select! {
            result = work => Ok(result),
            // A dropped sender means cancellation can no longer happen
            Ok(_) = cancel.wait_for(|cancelled| *cancelled) => {
                tracing::warn!("scan cancelled");
                Err(ScanError::Cancelled)
            }
        }
    }
}

/// Keeps the commits whose push status matches `scope`.
///
/// Applied even though the query was already scoped, since git's scope
/// selection and push status are computed independently.
pub fn filter_commits(commits: Vec<Commit>, scope: Scope) -> Vec<Commit> {
    commits
        .into_iter()
        .filter(|commit| scope.accepts(commit.pushed))
        .collect()
}

/// Sorts newest first; equal timestamps keep their arrival order
pub fn sort_commits(commits: &mut [Commit]) {
    commits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
