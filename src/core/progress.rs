//! Progress reporting while repositories are scanned

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::config::{PROGRESS_TEMPLATE, PROGRESS_TICK_INTERVAL_MS, SCANNING_MESSAGE};

/// Creates the spinner style used during a scan
pub(crate) fn create_progress_style() -> Result<ProgressStyle> {
    Ok(ProgressStyle::default_spinner().template(PROGRESS_TEMPLATE)?)
}

/// Creates a stderr spinner counting finished repositories
///
/// indicatif hides it automatically when stderr is not a terminal.
pub fn create_scan_progress() -> Result<ProgressBar> {
    let progress = ProgressBar::new(0);
    progress.set_style(create_progress_style()?);
    progress.set_message(SCANNING_MESSAGE);
    progress.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_INTERVAL_MS));
    Ok(progress)
}
