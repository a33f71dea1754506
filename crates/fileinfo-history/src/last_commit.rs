//! Last-modified timestamps for every file, read from one bulk `git log`.
//!
//! `git log --format=format:%aI --name-only -z` frames commits with `\0\0`
//! and separates the date line from the NUL-terminated path list with a
//! newline. A commit that changed no paths (an empty or merge commit) has
//! no path list, so its date is not followed by `\0\0` and instead runs
//! into the next record's date field, joined by a single `\0`:
//!
//! ```text
//! 2021-12-20T12:51:39+09:00\nC\0\0
//! 2021-12-20T12:51:28+09:00\02021-12-20T12:51:09+09:00\nB\0\0
//! 2021-12-20T12:50:58+09:00\nA\0\0
//! 2021-12-20T12:50:35+09:00
//! ```
//!
//! The last `\0`-separated segment of a date field belongs to the commit
//! that owns the path list; earlier segments are empty commits.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use fileinfo_core::FileinfoError;
use tracing::info;

use crate::command::ToolRunner;
use crate::inventory::FileInventory;

/// Path → ISO-8601 author date of the newest commit touching it, or `""`.
pub type LastCommitMap = HashMap<String, String>;

/// One commit record from the bulk log.
///
/// # Examples
///
/// ```
/// use fileinfo_history::last_commit::parse_commit_record;
///
/// let rec = parse_commit_record("2021-12-20T12:51:28+09:00\u{0}2021-12-20T12:51:09+09:00\nB").unwrap();
/// assert_eq!(rec.date, "2021-12-20T12:51:09+09:00");
/// assert_eq!(rec.paths, ["B"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord<'a> {
    /// Author date of the commit that owns `paths`.
    pub date: &'a str,
    /// Paths changed by that commit.
    pub paths: Vec<&'a str>,
}

/// Compute the last commit date of every inventory path.
///
/// Every path starts at `""`; commits touching paths outside the inventory
/// (deleted files) are ignored.
///
/// # Errors
///
/// Returns [`FileinfoError::Command`] if `git log` fails, or
/// [`FileinfoError::Parse`] if a record has no usable date.
pub fn scan_last_commits(
    runner: &ToolRunner,
    inventory: &FileInventory,
) -> Result<LastCommitMap, FileinfoError> {
    info!(files = inventory.len(), "analyzing last commit time");
    let stdout = runner.git(&["log", "--format=format:%aI", "--name-only", "-z"])?;
    let map = apply_log(inventory, &stdout)?;

    let dated = map.values().filter(|v| !v.is_empty()).count();
    info!(dated, undated = map.len() - dated, "last commit time done");
    Ok(map)
}

/// Fold raw `git log -z` output into a [`LastCommitMap`] for `inventory`.
///
/// # Errors
///
/// Returns [`FileinfoError::Parse`] on a record without a parsable date.
pub fn apply_log(inventory: &FileInventory, stdout: &str) -> Result<LastCommitMap, FileinfoError> {
    let mut latest: HashMap<&str, Option<(DateTime<FixedOffset>, &str)>> =
        inventory.iter().map(|p| (p, None)).collect();

    let body = stdout.trim_end_matches('\0');
    if !body.is_empty() {
        for raw in body.split("\0\0") {
            let record = parse_commit_record(raw)?;
            let instant = parse_instant(record.date)?;
            for path in record.paths {
                if let Some(slot) = latest.get_mut(path) {
                    let newer = match slot {
                        Some((current, _)) => instant > *current,
                        None => true,
                    };
                    if newer {
                        *slot = Some((instant, record.date));
                    }
                }
            }
        }
    }

    Ok(latest
        .into_iter()
        .map(|(path, slot)| {
            let date = slot.map(|(_, d)| d.to_string()).unwrap_or_default();
            (path.to_string(), date)
        })
        .collect())
}

/// Split one `\0\0`-framed record into its owning date and path list.
///
/// # Errors
///
/// Returns [`FileinfoError::Parse`] if the record has no date field.
pub fn parse_commit_record(raw: &str) -> Result<CommitRecord<'_>, FileinfoError> {
    let (date_field, paths_field) = match raw.split_once('\n') {
        Some((d, p)) => (d, p),
        None => (raw, ""),
    };

    let date = date_field
        .rsplit('\0')
        .next()
        .filter(|d| !d.is_empty())
        .ok_or_else(|| {
            FileinfoError::Parse(format!("commit date could not be determined: {raw:?}"))
        })?;

    let paths = paths_field
        .trim_start_matches('\n')
        .split('\0')
        .filter(|p| !p.is_empty())
        .collect();

    Ok(CommitRecord { date, paths })
}

pub(crate) fn parse_instant(date: &str) -> Result<DateTime<FixedOffset>, FileinfoError> {
    DateTime::parse_from_rfc3339(date.trim())
        .map_err(|e| FileinfoError::Parse(format!("invalid commit date {date:?}: {e}")))
}
