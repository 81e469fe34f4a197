//! Human-readable commit listing grouped by calendar day

use chrono::{DateTime, NaiveDate, TimeZone};
use std::fmt::{Display, Write};

use crate::git::Commit;

const DAY_RULE_WIDTH: usize = 40;
const COMMIT_SEPARATOR: &str = "· ";
const MESSAGE_INDENT: &str = "    ";

/// ANSI escape sequences used by the listing; all empty when color is off
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub reset: &'static str,
    pub bold: &'static str,
    pub dim: &'static str,
    pub black: &'static str,
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub blue: &'static str,
    pub magenta: &'static str,
    pub cyan: &'static str,
    pub bg_blue: &'static str,
}

impl Palette {
    pub const ANSI: Palette = Palette {
        reset: "\x1b[0m",
        bold: "\x1b[1m",
        dim: "\x1b[2m",
        black: "\x1b[30m",
        red: "\x1b[31m",
        green: "\x1b[32m",
        yellow: "\x1b[33m",
        blue: "\x1b[34m",
        magenta: "\x1b[35m",
        cyan: "\x1b[36m",
        bg_blue: "\x1b[44m",
    };

    pub const PLAIN: Palette = Palette {
        reset: "",
        bold: "",
        dim: "",
        black: "",
        red: "",
        green: "",
        yellow: "",
        blue: "",
        magenta: "",
        cyan: "",
        bg_blue: "",
    };

    pub fn new(color: bool) -> Self {
        if color {
            Self::ANSI
        } else {
            Self::PLAIN
        }
    }
}

/// Renders `commits` (already ordered) relative to `now`'s calendar day.
///
/// A day header is written whenever the local date changes between
/// consecutive commits.
pub fn render_commits<Tz>(commits: &[Commit], now: &DateTime<Tz>, palette: Palette) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut out = String::new();
    let p = palette;

    let header = format!("🔍 Found {} commits", commits.len());
    let _ = writeln!(out, "\n{}{header}{}", p.bold, p.reset);
    let _ = writeln!(
        out,
        "{}{}{}\n",
        p.dim,
        "─".repeat(header.chars().count()),
        p.reset
    );

    let today = now.date_naive();
    let tz = now.timezone();
    let mut current_day: Option<NaiveDate> = None;

    for commit in commits {
        let local = commit.timestamp.with_timezone(&tz);
        let day = local.date_naive();

        if current_day != Some(day) {
            if current_day.is_some() {
                out.push('\n');
            }
            write_day_header(&mut out, day, today, &local, p);
            current_day = Some(day);
        }

        write_commit(&mut out, commit, &local, p);
    }

    out
}

fn write_day_header<Tz>(out: &mut String, day: NaiveDate, today: NaiveDate, local: &DateTime<Tz>, p: Palette)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let (color, label) = if day == today {
        (p.green, "Today".to_string())
    } else if today.pred_opt() == Some(day) {
        (p.yellow, "Yesterday".to_string())
    } else {
        (p.blue, local.format("%A, %B %-d").to_string())
    };

    let _ = writeln!(out, "{}{color}📅 {label}{}", p.bold, p.reset);
    let _ = writeln!(out, "{}{}{}", p.dim, "─".repeat(DAY_RULE_WIDTH), p.reset);
}

fn write_commit<Tz>(out: &mut String, commit: &Commit, local: &DateTime<Tz>, p: Palette)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let push_status = if commit.pushed {
        format!("{}✓{}", p.green, p.reset)
    } else {
        format!("{}✗{}", p.red, p.reset)
    };

    let _ = writeln!(
        out,
        "\n{}{} {} {} {push_status} [{}{}{}] {}{}{}@{}{}{}",
        p.bg_blue,
        p.black,
        commit.short_id,
        p.reset,
        p.magenta,
        commit.repository_name(),
        p.reset,
        p.cyan,
        commit.author,
        p.reset,
        p.dim,
        local.format("%H:%M:%S"),
        p.reset,
    );

    for (i, line) in commit.message.lines().enumerate() {
        if i == 0 {
            let _ = writeln!(out, "{MESSAGE_INDENT}{}{line}{}", p.bold, p.reset);
        } else if !line.trim().is_empty() {
            let _ = writeln!(out, "{MESSAGE_INDENT}{}{line}{}", p.dim, p.reset);
        }
    }

    let _ = writeln!(out, "{}{}{}", p.dim, COMMIT_SEPARATOR.repeat(DAY_RULE_WIDTH), p.reset);
}

/// Renders commits as a pretty-printed JSON array
pub fn render_json(commits: &[Commit]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(commits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::PathBuf;

    fn commit_at(id: &str, when: DateTime<Utc>, message: &str, pushed: bool) -> Commit {
        let mut commit = Commit::new(id, "Ada Lovelace", when, message);
        commit.repository_path = PathBuf::from("/src/engine");
        commit.pushed = pushed;
        commit
    }

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_groups_by_day_once_per_group() {
        let commits = vec![
            commit_at("aaaaaaaaaa", utc(15, 9), "today two", true),
            commit_at("bbbbbbbbbb", utc(15, 8), "today one", false),
            commit_at("cccccccccc", utc(14, 20), "yesterday", false),
            commit_at("dddddddddd", utc(11, 7), "older", false),
        ];
        let out = render_commits(&commits, &utc(15, 12), Palette::PLAIN);

        assert!(out.contains("🔍 Found 4 commits"));
        assert_eq!(out.matches("📅 Today").count(), 1);
        assert_eq!(out.matches("📅 Yesterday").count(), 1);
        assert!(out.contains("📅 Monday, March 11"));
        assert!(out.find("today two").unwrap() < out.find("yesterday").unwrap());
    }

    #[test]
    fn test_commit_line_plain() {
        let commits = vec![commit_at("0123456789ab", utc(15, 9), "Subject\n\nBody line", true)];
        let out = render_commits(&commits, &utc(15, 12), Palette::PLAIN);

        assert!(out.contains(" 01234567  ✓ [engine] Ada Lovelace@09:00:00"));
        assert!(out.contains("    Subject\n    Body line\n"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn test_color_uses_ansi() {
        let commits = vec![commit_at("0123456789ab", utc(15, 9), "Subject", false)];
        let out = render_commits(&commits, &utc(15, 12), Palette::ANSI);

        assert!(out.contains("\x1b[31m✗\x1b[0m"));
    }

    #[test]
    fn test_json_fields() {
        let commits = vec![commit_at("0123456789ab", utc(15, 9), "Subject", true)];
        let json: serde_json::Value = serde_json::from_str(&render_json(&commits).unwrap()).unwrap();

        assert_eq!(json[0]["short_id"], "01234567");
        assert_eq!(json[0]["repository_path"], "/src/engine");
        assert_eq!(json[0]["pushed"], true);
        assert_eq!(json[0]["timestamp"], "2024-03-15T09:00:00Z");
    }
}
