//! # gcom
//!
//! `gcom` finds every git repository under a directory, asks each one for its
//! recent history concurrently, and merges the answers into one list ordered
//! newest first. It powers the `gcom` CLI tool.
//!
//! ## Core Features
//!
//! - **Discovery**: shallow (root and children) or recursive scanning, with
//!   each candidate confirmed by git itself.
//! - **Concurrent Scanning**: one query per repository under a concurrency
//!   ceiling, with cancellation that kills outstanding git processes.
//! - **Push Status**: every commit is marked pushed or unpushed against the
//!   remote-tracking refs, and results can be filtered on it.
//! - **Time Windows**: today, last N hours, or last N days.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gcom::core::{ScanOptions, Scanner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let options = ScanOptions { days: 2, ..ScanOptions::default() };
//!     for commit in Scanner::new(".").scan(&options).await? {
//!         println!("{} {} {}", commit.short_id, commit.repository_name(), commit.message);
//!     }
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod core;
pub mod display;
pub mod git;
pub mod utils;
