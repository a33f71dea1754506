//! Per-file churn totals over the effective window, from `git log --numstat`.

use std::collections::HashMap;

use fileinfo_core::FileinfoError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::command::ToolRunner;
use crate::window::ChurnWindow;

/// Line emitted once per commit ahead of its numstat rows.
pub const COMMIT_SENTINEL: &str = "#";

/// Churn accumulated for one path within the window.
///
/// # Examples
///
/// ```
/// use fileinfo_history::churn::ChurnRecord;
///
/// let mut rec = ChurnRecord::default();
/// rec.record(10, 2);
/// rec.record(0, 3);
/// assert_eq!(rec, ChurnRecord { occurrence: 2, additions: 10, deletions: 5 });
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnRecord {
    /// Commits that touched the path.
    pub occurrence: u64,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
}

impl ChurnRecord {
    /// Account for one commit touching the path.
    pub fn record(&mut self, additions: u64, deletions: u64) {
        self.occurrence += 1;
        self.additions += additions;
        self.deletions += deletions;
    }
}

/// Result of aggregating numstat output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChurnTotals {
    /// Commits listed by the numstat query.
    pub number_of_commits: u64,
    /// Churn per path, including paths no longer in the working tree.
    pub records: HashMap<String, ChurnRecord>,
}

impl ChurnTotals {
    /// Churn for `path`; `None` when the window never touched it.
    pub fn get(&self, path: &str) -> Option<ChurnRecord> {
        self.records.get(path).copied()
    }
}

/// Aggregate churn from the window's oldest commit up to `HEAD`, inclusive.
///
/// The oldest commit is part of the range, so a full count window of
/// `window_commits` commits yields `window_commits` commits here, and a
/// single-commit repository reports that commit's churn. A plain
/// `oldest..HEAD` range would drop it.
///
/// `number_of_commits` counts the commits this query actually lists, which
/// can differ from `window.count` around merges.
///
/// # Errors
///
/// Returns [`FileinfoError::Command`] if `git log` fails.
pub fn aggregate_churn(
    runner: &ToolRunner,
    window: &ChurnWindow,
) -> Result<ChurnTotals, FileinfoError> {
    info!(since = %window.oldest_commit_id, "analyzing code churn");

    // `<oldest>^@` names the oldest commit's parents (nothing for a root
    // commit), so the range keeps the oldest commit itself.
    let exclude_parents = format!("{}^@", window.oldest_commit_id);
    let format = format!("--format=format:{COMMIT_SENTINEL}");
    let stdout = runner.git(&[
        "log",
        "--reverse",
        "--no-renames",
        &format,
        "--numstat",
        "HEAD",
        "--not",
        &exclude_parents,
        "--",
    ])?;

    let totals = parse_numstat(&stdout);
    info!(
        commits = totals.number_of_commits,
        paths = totals.records.len(),
        "code churn done"
    );
    Ok(totals)
}

/// Fold sentinel-framed `git log --numstat` output into [`ChurnTotals`].
///
/// Rows missing a field or carrying a non-numeric count are dropped.
/// Binary rows (`-` counts) count as an occurrence with zero lines.
///
/// # Examples
///
/// ```
/// use fileinfo_history::churn::parse_numstat;
///
/// let totals = parse_numstat("#\n\n3\t1\tsrc/lib.rs\n-\t-\tlogo.png\n#\n\n2\t0\tsrc/lib.rs\n");
/// assert_eq!(totals.number_of_commits, 2);
/// assert_eq!(totals.get("src/lib.rs").unwrap().additions, 5);
/// assert_eq!(totals.get("logo.png").unwrap().occurrence, 1);
/// ```
pub fn parse_numstat(stdout: &str) -> ChurnTotals {
    let mut totals = ChurnTotals::default();

    for line in stdout.lines() {
        if line == COMMIT_SENTINEL {
            totals.number_of_commits += 1;
            continue;
        }
        match parse_numstat_line(line) {
            Some((adds, dels, path)) => {
                totals
                    .records
                    .entry(path.to_string())
                    .or_default()
                    .record(adds, dels);
            }
            None if !line.is_empty() => debug!(line, "dropping malformed numstat line"),
            None => {}
        }
    }

    totals
}

fn parse_numstat_line(line: &str) -> Option<(u64, u64, &str)> {
    let mut fields = line.splitn(3, '\t');
    let adds = fields.next()?;
    let dels = fields.next()?;
    let path = fields.next().filter(|p| !p.is_empty())?;
    Some((parse_count(adds)?, parse_count(dels)?, path))
}

fn parse_count(field: &str) -> Option<u64> {
    if field == "-" {
        Some(0)
    } else {
        field.parse().ok()
    }
}
