//! Piping output through a terminal pager

use anyhow::{Context, Result};
use std::io::{self, IsTerminal, Write};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Whether output should go through a pager at all
pub fn should_page(disabled: bool) -> bool {
    !disabled && io::stdout().is_terminal()
}

/// Feeds `output` to `pager` (run through `sh -c`) and waits for it to exit
pub async fn page(output: &str, pager: &str) -> Result<()> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(pager)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to start pager `{pager}`"))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(output.as_bytes()).await {
            // The user quit the pager before reading everything
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {}
            other => other.context("failed to write to pager")?,
        }
    }

    let status = child.wait().await.context("pager did not exit cleanly")?;
    if !status.success() {
        anyhow::bail!("pager `{pager}` exited with {status}");
    }
    Ok(())
}

/// Writes `output` to stdout directly
pub fn print(output: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}
