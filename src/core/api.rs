//! Public API for the core module.
//!
//! This module provides the stable public API for core functionality including:
//! - Time window computation
//! - Repository discovery
//! - The scan coordinator and its result types
//! - Configuration utilities
//!
//! Internal implementation details are not exposed through this API.

// Scanning
pub use super::scanner::{filter_commits, sort_commits, ScanReport, Scanner};
pub use super::window::{compute_since, start_of_day, ScanOptions};

// Progress
pub use super::progress::create_scan_progress;

// Discovery
pub use super::discovery::{
    confirm_repository, discover, find_candidates, has_git_metadata, DiscoveryMode,
};

// Errors
pub use super::error::{RepoScanError, ScanError};

// Configuration
pub use super::config::{get_git_concurrency, resolve_pager, settings_path, Settings};
pub use super::config::{
    CONFIG_PATH_ENV, GIT_CONCURRENT_CAP, LOG_FILTER_ENV, MAX_SCAN_DEPTH, NO_COLOR_ENV, PAGER_ENV,
    PATH_DISPLAY_WIDTH,
};
