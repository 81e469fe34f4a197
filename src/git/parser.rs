//! Parser for `git log` output in the four-field record format
//!
//! Records are one per line, fields separated by NUL:
//! full id, author name, author time (unix seconds), subject.

use chrono::DateTime;
use thiserror::Error;

use super::commit::Commit;

/// Field separator emitted by [`LOG_FORMAT`]
pub const FIELD_SEPARATOR: char = '\0';

/// `--format` argument producing one parseable record per line
pub const LOG_FORMAT: &str = "--format=%H%x00%an%x00%at%x00%s";

const FIELD_COUNT: usize = 4;

/// Why a single record was skipped
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {FIELD_COUNT} fields, found {0}")]
    FieldCount(usize),

    #[error("empty commit id")]
    EmptyId,

    #[error("invalid timestamp {0:?}")]
    Timestamp(String),
}

/// Parses one record line into a [`Commit`]
pub fn parse_commit_line(line: &str) -> Result<Commit, ParseError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let id = fields[0].trim();
    if id.is_empty() {
        return Err(ParseError::EmptyId);
    }

    let timestamp = fields[2]
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or_else(|| ParseError::Timestamp(fields[2].to_string()))?;

    Ok(Commit::new(id, fields[1], timestamp, fields[3]))
}

/// Parses a full `git log` output, discarding malformed records
pub fn parse_log_output(output: &str) -> Vec<Commit> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match parse_commit_line(line) {
            Ok(commit) => Some(commit),
            Err(e) => {
                tracing::debug!(record = %line.escape_debug(), "skipping malformed log record: {e}");
                None
            }
        })
        .collect()
}
