//! Core scanning engine
//!
//! This module provides:
//! - Time window computation
//! - Repository discovery
//! - Concurrent scanning with filtering and ordering
//! - Scan progress reporting
//! - Configuration and the error taxonomy

// Internal modules - not part of public API
pub(crate) mod config;
pub(crate) mod discovery;
pub(crate) mod error;
pub(crate) mod progress;
pub(crate) mod scanner;
pub(crate) mod window;

// Public API - curated exports only
pub mod api;

// Re-export key items at module level for convenience
pub use api::*;
