//! Recent-commits command implementation
//!
//! This module glues the scan engine to the terminal: it resolves settings,
//! drives the scan with a progress spinner, and renders or pages the result.

use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::core::{
    compute_since, create_scan_progress, get_git_concurrency, resolve_pager, DiscoveryMode,
    RepoScanError, ScanError, ScanOptions, Scanner, Settings, NO_COLOR_ENV, PAGER_ENV,
    PATH_DISPLAY_WIDTH,
};
use crate::display::{page, print, render_commits, render_json, should_page, Palette};
use crate::git::SystemGit;
use crate::utils::shorten_path;

/// Options for one invocation of the command
#[derive(Debug, Clone, Default)]
pub struct LogArgs {
    pub options: ScanOptions,
    pub root: PathBuf,
    pub recursive: bool,
    pub jobs: Option<usize>,
    pub sequential: bool,
    pub keep_going: bool,
    pub json: bool,
    pub no_pager: bool,
    pub no_color: bool,
}

/// Handles the recent-commits command
pub async fn handle_log_command(
    args: LogArgs,
    settings: Settings,
    cancel: watch::Receiver<bool>,
) -> Result<()> {
    let discovery = if args.recursive || settings.recursive {
        DiscoveryMode::Recursive {
            max_depth: settings.max_depth,
        }
    } else {
        DiscoveryMode::Shallow
    };
    let concurrency = get_git_concurrency(args.jobs, args.sequential, &settings);
    let runner = Arc::new(SystemGit::new(Duration::from_secs(settings.timeout_secs)));
    let progress = create_scan_progress()?;

    let scanner = Scanner::new(&args.root)
        .with_discovery(discovery)
        .with_concurrency(concurrency)
        .with_runner(runner)
        .with_progress(progress.clone())
        .with_cancellation(cancel);

    let now = Local::now();
    let result = scanner.scan_report_at(&args.options, now).await;
    progress.finish_and_clear();

    let report = result?;
    let keep_going = args.keep_going || settings.keep_going;
    if !report.failures.is_empty() && !keep_going {
        return Err(ScanError::Query(report.failures).into());
    }

    let output = if args.json {
        render_json(&report.commits)? + "\n"
    } else if report.commits.is_empty() {
        let since = compute_since(&args.options, &now);
        format!(
            "No commits found since {} in {} repositories\n",
            since.format("%Y-%m-%d %H:%M:%S"),
            report.repositories
        )
    } else {
        let color = !args.no_color && settings.color && std::env::var_os(NO_COLOR_ENV).is_none();
        render_commits(&report.commits, &now, Palette::new(color))
    };

    if !report.failures.is_empty() {
        eprintln!("{}", format_failures(&report.failures));
    }

    if !args.json && should_page(args.no_pager) {
        let env_pager = std::env::var(PAGER_ENV).ok();
        page(&output, &resolve_pager(env_pager.as_deref(), &settings)).await
    } else {
        print(&output)
    }
}

/// Lists repositories whose history query failed, one per line
pub fn format_failures(failures: &[RepoScanError]) -> String {
    let mut lines = vec![format!("🔴 FAILED REPOS ({})", failures.len())];

    for (i, failure) in failures.iter().enumerate() {
        let tree_char = if i == failures.len() - 1 { "└─" } else { "├─" };
        let repo_name = failure
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let short_path = shorten_path(&failure.path.to_string_lossy(), PATH_DISPLAY_WIDTH);
        let error = failure.source.to_string().replace('\n', " ");
        lines.push(format!(
            "   {tree_char} {repo_name:20} {short_path:30} # {error}"
        ));
    }

    lines.join("\n")
}
