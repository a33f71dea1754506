//! Churn window selection.
//!
//! Churn is measured over a bounded range of recent commits. Two
//! candidates are computed, both ending at the newest commit:
//!
//! - the count window, the latest `window_commits` commits;
//! - the time window, every commit within `window_days` of the newest one.
//!
//! A quiet project has few commits in the time window, which makes churn
//! noisy, so whichever candidate holds more commits is used.

use chrono::{DateTime, Duration, FixedOffset};
use fileinfo_core::{ChurnConfig, FileinfoError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::command::ToolRunner;
use crate::last_commit::parse_instant;

/// Summary of a contiguous commit range ending at the newest commit.
///
/// # Examples
///
/// ```
/// use fileinfo_history::window::parse_commit_summary;
///
/// let out = "c3|2024-03-01T00:00:00+00:00\nc2|2024-02-01T00:00:00+00:00\nc1|2024-01-01T00:00:00+00:00";
/// let window = parse_commit_summary(out).unwrap();
/// assert_eq!(window.count, 3);
/// assert_eq!(window.latest_commit_id, "c3");
/// assert_eq!(window.oldest_commit_id, "c1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChurnWindow {
    /// Commits in the range (at least 1).
    pub count: usize,
    /// Hash of the newest commit.
    pub latest_commit_id: String,
    /// Committer date of the newest commit.
    pub latest_timestamp: DateTime<FixedOffset>,
    /// Hash of the oldest commit.
    pub oldest_commit_id: String,
    /// Committer date of the oldest commit.
    pub oldest_timestamp: DateTime<FixedOffset>,
}

/// Which candidate became the effective window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    /// The latest N commits.
    Count,
    /// Commits within N days of the newest commit.
    Time,
}

/// The effective churn window and how it was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowChoice {
    /// Candidate that won.
    pub kind: WindowKind,
    /// Bounds of the effective window.
    #[serde(flatten)]
    pub window: ChurnWindow,
}

/// Query both candidate windows and pick the effective one.
///
/// The repository must have at least one commit.
///
/// # Errors
///
/// Returns [`FileinfoError::Command`] if a `git log` query fails, or
/// [`FileinfoError::Parse`] if a query returns no usable line.
pub fn select_churn_window(
    runner: &ToolRunner,
    config: &ChurnConfig,
) -> Result<WindowChoice, FileinfoError> {
    let max_count = format!("--max-count={}", config.window_commits);
    let by_count = commit_summary(runner, &max_count)?;

    let since = time_window_start(by_count.latest_timestamp, config.window_days)?;
    let since = format!("--since={}", since.to_rfc3339());
    let by_time = commit_summary(runner, &since)?;

    let choice = choose_window(by_count, by_time);
    info!(
        kind = ?choice.kind,
        commits = choice.window.count,
        oldest = %choice.window.oldest_commit_id,
        latest = %choice.window.latest_commit_id,
        "selected churn window"
    );
    Ok(choice)
}

/// Start of the time window: `window_days` whole days before `latest`.
///
/// # Errors
///
/// Returns [`FileinfoError::Config`] if the start falls outside the
/// representable date range.
pub fn time_window_start(
    latest: DateTime<FixedOffset>,
    window_days: u32,
) -> Result<DateTime<FixedOffset>, FileinfoError> {
    Duration::try_days(i64::from(window_days))
        .and_then(|span| latest.checked_sub_signed(span))
        .ok_or_else(|| {
            FileinfoError::Config(format!(
                "churn.window_days = {window_days} reaches past the earliest representable date"
            ))
        })
}

/// Pick the candidate with more commits; on a tie the count window wins.
///
/// Both candidates list the same history newest-first, so equal counts
/// mean equal bounds.
///
/// # Examples
///
/// ```
/// use fileinfo_history::window::{choose_window, parse_commit_summary, WindowKind};
///
/// let by_count = parse_commit_summary("b|2024-03-01T00:00:00Z\na|2024-01-01T00:00:00Z").unwrap();
/// let by_time = parse_commit_summary("b|2024-03-01T00:00:00Z").unwrap();
/// assert_eq!(choose_window(by_count, by_time).kind, WindowKind::Count);
/// ```
pub fn choose_window(by_count: ChurnWindow, by_time: ChurnWindow) -> WindowChoice {
    if by_count.count >= by_time.count {
        WindowChoice {
            kind: WindowKind::Count,
            window: by_count,
        }
    } else {
        WindowChoice {
            kind: WindowKind::Time,
            window: by_time,
        }
    }
}

fn commit_summary(runner: &ToolRunner, range: &str) -> Result<ChurnWindow, FileinfoError> {
    let stdout = runner.git(&["log", "--format=format:%H|%cI", range])?;
    parse_commit_summary(&stdout)
}

/// Parse newest-first `<hash>|<iso date>` lines into a [`ChurnWindow`].
///
/// # Errors
///
/// Returns [`FileinfoError::Parse`] if there is no line, or if the first
/// or last line lacks a hash or a valid date.
pub fn parse_commit_summary(stdout: &str) -> Result<ChurnWindow, FileinfoError> {
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();
    let (Some(latest), Some(oldest)) = (lines.first(), lines.last()) else {
        return Err(FileinfoError::Parse(
            "commit summary returned no commits".into(),
        ));
    };

    let (latest_commit_id, latest_timestamp) = parse_summary_line(latest, "latest")?;
    let (oldest_commit_id, oldest_timestamp) = parse_summary_line(oldest, "oldest")?;

    Ok(ChurnWindow {
        count: lines.len(),
        latest_commit_id,
        latest_timestamp,
        oldest_commit_id,
        oldest_timestamp,
    })
}

fn parse_summary_line(
    line: &str,
    which: &str,
) -> Result<(String, DateTime<FixedOffset>), FileinfoError> {
    let (sha, time) = line
        .split_once('|')
        .ok_or_else(|| FileinfoError::Parse(format!("required time in the {which} line: {line}")))?;
    if sha.is_empty() {
        return Err(FileinfoError::Parse(format!(
            "required sha in the {which} line: {line}"
        )));
    }
    Ok((sha.to_string(), parse_instant(time)?))
}
