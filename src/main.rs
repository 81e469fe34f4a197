//! gcom: recent commits across every git repository under a directory

use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gcom::commands::{handle_log_command, LogArgs};
use gcom::core::{ScanOptions, Settings, LOG_FILTER_ENV};

#[derive(Parser)]
#[command(name = "gcom")]
#[command(about = "Show recent commits from every git repository under a directory")]
#[command(version)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Directory to scan (defaults to the current directory)
    path: Option<PathBuf>,

    /// Show only unpushed commits
    #[arg(short = 'u', long)]
    unpushed: bool,

    /// Show only pushed commits
    #[arg(short = 'p', long)]
    pushed: bool,

    /// Show commits since midnight today
    #[arg(short = 't', long)]
    today: bool,

    /// Show commits from the last N hours
    #[arg(short = 'h', long, value_name = "N", default_value_t = 0)]
    hours: u32,

    /// Show commits from the last N days
    #[arg(short = 'd', long, value_name = "N", default_value_t = 0)]
    days: u32,

    /// Search the whole directory tree instead of the directory and its children
    #[arg(short = 'r', long)]
    recursive: bool,

    /// Number of repositories to scan concurrently
    #[arg(short = 'j', long, value_name = "N")]
    jobs: Option<usize>,

    /// Scan one repository at a time
    #[arg(long, conflicts_with = "jobs")]
    sequential: bool,

    /// Show commits from healthy repositories even if others fail
    #[arg(long)]
    keep_going: bool,

    /// Print commits as JSON
    #[arg(long)]
    json: bool,

    /// Do not pipe output through a pager
    #[arg(long)]
    no_pager: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    fn into_log_args(self) -> LogArgs {
        LogArgs {
            options: ScanOptions {
                today: self.today,
                hours: self.hours,
                days: self.days,
                unpushed_only: self.unpushed,
                pushed_only: self.pushed,
            },
            root: self.path.unwrap_or_else(|| PathBuf::from(".")),
            recursive: self.recursive,
            jobs: self.jobs,
            sequential: self.sequential,
            keep_going: self.keep_going,
            json: self.json,
            no_pager: self.no_pager,
            no_color: self.no_color,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("gcom={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::load()?;

    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    handle_log_command(cli.into_log_args(), settings, cancel_rx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags_combine_freely() {
        let cli = Cli::try_parse_from(["gcom", "-u", "-p", "-t", "-h", "5", "-d", "2"]).unwrap();
        let args = cli.into_log_args();

        assert!(args.options.unpushed_only && args.options.pushed_only && args.options.today);
        assert_eq!(args.options.hours, 5);
        assert_eq!(args.options.days, 2);
        assert_eq!(args.root, PathBuf::from("."));
    }

    #[test]
    fn test_long_flags_and_path() {
        let cli = Cli::try_parse_from([
            "gcom", "--hours", "3", "--recursive", "--jobs", "4", "--json", "/src",
        ])
        .unwrap();
        let args = cli.into_log_args();

        assert_eq!(args.options.hours, 3);
        assert!(args.recursive && args.json);
        assert_eq!(args.jobs, Some(4));
        assert_eq!(args.root, PathBuf::from("/src"));
    }
}
