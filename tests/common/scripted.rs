//! Scripted git runner for scenarios real repositories cannot produce on demand

use async_trait::async_trait;
use gcom::git::{GitError, GitOutput, GitRunner};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Canned answers for one repository
#[derive(Clone, Default)]
pub struct RepoScript {
    /// Result of `git log`
    pub log: GitOutput,
    /// Ids reported as contained in a remote-tracking branch
    pub pushed_ids: Vec<String>,
    /// Every `branch -r --contains` call exits non-zero
    pub push_query_fails: bool,
}

impl RepoScript {
    pub fn with_log(records: &[(&str, i64, &str)]) -> Self {
        let stdout: String = records
            .iter()
            .map(|(id, secs, subject)| format!("{id}\0Test User\0{secs}\0{subject}\n"))
            .collect();
        Self {
            log: GitOutput::ok(stdout),
            ..Self::default()
        }
    }

    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self {
            log: GitOutput::failed(exit_code, stderr),
            ..Self::default()
        }
    }

    pub fn pushed(mut self, ids: &[&str]) -> Self {
        self.pushed_ids = ids.iter().map(|id| id.to_string()).collect();
        self
    }
}

/// Answers git calls from per-directory scripts.
///
/// `rev-parse --show-toplevel` echoes the directory back so discovery
/// confirms every scripted repository.
#[derive(Default)]
pub struct ScriptedGit {
    scripts: Mutex<HashMap<PathBuf, RepoScript>>,
    log_delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `script` for the directory at `path`
    pub fn script(self, path: &Path, script: RepoScript) -> Self {
        let canonical = path.canonicalize().expect("scripted repo must exist");
        self.scripts.lock().unwrap().insert(canonical, script);
        self
    }

    /// Makes every `git log` call take `delay`
    pub fn with_log_delay(mut self, delay: Duration) -> Self {
        self.log_delay = Some(delay);
        self
    }

    /// Highest number of `git log` calls observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GitRunner for ScriptedGit {
    async fn run(&self, path: &Path, args: &[String]) -> Result<GitOutput, GitError> {
        let script = self.scripts.lock().unwrap().get(path).cloned();

        match args.first().map(String::as_str) {
            Some("rev-parse") if args.iter().any(|a| a == "--show-toplevel") => match script {
                Some(_) => Ok(GitOutput::ok(format!("{}\n", path.display()))),
                None => Ok(GitOutput::failed(128, "fatal: not a git repository")),
            },
            Some("rev-parse") => Ok(GitOutput::ok("0000000000000000000000000000000000000000")),
            Some("log") => {
                let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_in_flight.fetch_max(current, Ordering::SeqCst);
                if let Some(delay) = self.log_delay {
                    tokio::time::sleep(delay).await;
                }
                self.in_flight.fetch_sub(1, Ordering::SeqCst);
                Ok(script.map(|s| s.log).unwrap_or_default())
            }
            Some("branch") => {
                let script = script.unwrap_or_default();
                if script.push_query_fails {
                    return Ok(GitOutput::failed(129, "error: malformed object name"));
                }
                let id = args.last().cloned().unwrap_or_default();
                if script.pushed_ids.contains(&id) {
                    Ok(GitOutput::ok("  origin/main\n"))
                } else {
                    Ok(GitOutput::ok(""))
                }
            }
            other => panic!("unexpected git invocation {other:?}"),
        }
    }
}
