//! Command implementations

pub mod log;

pub use log::{format_failures, handle_log_command, LogArgs};
