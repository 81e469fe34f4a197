//! Configuration constants and settings
//!
//! Settings come from an optional TOML file; command-line flags override them.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Concurrency Configuration
//
// Each repository scan spends its time waiting on git subprocesses, so the
// ceiling is about bounding spawn storms rather than CPU usage.

/// Upper bound for the default repository scan concurrency
pub const GIT_CONCURRENT_CAP: usize = 12;

/// Concurrent `branch -r --contains` queries within one repository
pub const PUSH_STATUS_CONCURRENCY: usize = 4;

/// Concurrent `rev-parse` confirmations during discovery
pub const DISCOVERY_CONFIRM_CONCURRENCY: usize = 16;

// Timeout constants
pub const GIT_OPERATION_TIMEOUT_SECS: u64 = 180; // 3 minutes per git invocation

// Repository discovery configuration
pub const MAX_SCAN_DEPTH: usize = 10; // Maximum directory depth for recursive scans
pub const ESTIMATED_REPO_COUNT: usize = 50; // Pre-allocation hint for collections
pub const GIT_METADATA_DIR: &str = ".git";

// Directories never descended into during recursive discovery
pub const SKIP_DIRECTORIES: &[&str] = &[
    "node_modules",
    "vendor",
    "target",
    "build",
    ".next",
    "dist",
    "__pycache__",
    ".venv",
    "venv",
];

// UI Constants
pub const SCANNING_MESSAGE: &str = "🔍 Scanning git repositories...";
pub const PROGRESS_TEMPLATE: &str = "{spinner} {msg} {pos}/{len}";
pub const PROGRESS_TICK_INTERVAL_MS: u64 = 100;
pub const PATH_DISPLAY_WIDTH: usize = 30;

// Pager configuration
pub const DEFAULT_PAGER: &str = "less";
pub const LESS_PAGER_COMMAND: &str = "less -R -F -X";

// Environment variables
pub const CONFIG_PATH_ENV: &str = "GCOM_CONFIG";
pub const LOG_FILTER_ENV: &str = "GCOM_LOG";
pub const PAGER_ENV: &str = "PAGER";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

const CONFIG_DIR_NAME: &str = "gcom";
const CONFIG_FILE_NAME: &str = "config.toml";

/// User settings loaded from `config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Maximum number of repositories scanned at once
    pub concurrency: Option<usize>,
    /// Walk the whole subtree instead of the root and its children
    pub recursive: bool,
    pub max_depth: usize,
    pub timeout_secs: u64,
    /// Pager used when `$PAGER` is unset
    pub pager: Option<String>,
    /// Show results from healthy repositories even when others fail
    pub keep_going: bool,
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            concurrency: None,
            recursive: false,
            max_depth: MAX_SCAN_DEPTH,
            timeout_secs: GIT_OPERATION_TIMEOUT_SECS,
            pager: None,
            keep_going: false,
            color: true,
        }
    }
}

impl Settings {
    /// Parses settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads settings from `path`, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)
                .with_context(|| format!("invalid settings file {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Loads settings from `$GCOM_CONFIG` or the user config directory
    pub fn load() -> Result<Self> {
        match settings_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }
}

/// Location of the settings file, if one can be determined
pub fn settings_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Determines the scan concurrency ceiling
///
/// Priority order:
/// 1. --sequential flag → 1
/// 2. --jobs N flag → N
/// 3. `concurrency` setting → N
/// 4. Smart default → min(CPU_CORES + 2, 12)
pub fn get_git_concurrency(jobs: Option<usize>, sequential: bool, settings: &Settings) -> usize {
    if sequential {
        return 1;
    }

    if let Some(n) = jobs.or(settings.concurrency) {
        return n.max(1); // Ensure at least 1
    }

    (num_cpus::get() + 2).min(GIT_CONCURRENT_CAP)
}

/// Resolves the pager command line
///
/// `$PAGER` wins over the `pager` setting; `less` is the fallback. Any
/// less-family pager is forced into raw-color, quit-if-one-screen,
/// no-init mode.
pub fn resolve_pager(env_pager: Option<&str>, settings: &Settings) -> String {
    let pager = env_pager
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .or(settings.pager.as_deref().map(str::trim).filter(|p| !p.is_empty()))
        .unwrap_or(DEFAULT_PAGER);

    if pager.contains(DEFAULT_PAGER) {
        LESS_PAGER_COMMAND.to_string()
    } else {
        pager.to_string()
    }
}
