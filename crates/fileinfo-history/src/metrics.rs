//! Metric assembly: drives the scanners and joins their maps per file.

use std::fmt;
use std::path::Path;

use fileinfo_core::{FileFinding, FileinfoConfig, FileinfoError, MetricRecord};
use serde::Serialize;
use tracing::{info, warn};

use crate::churn::{aggregate_churn, ChurnTotals};
use crate::classify::classify_text_files;
use crate::command::ToolRunner;
use crate::inventory::{walk_inventory, FileInventory};
use crate::last_commit::{scan_last_commits, LastCommitMap};
use crate::loc::{count_lines, LineCount};
use crate::repo;
use crate::window::{select_churn_window, WindowChoice};

/// Metrics for every file of one working tree.
///
/// # Examples
///
/// ```
/// use fileinfo_history::metrics::MetricsReport;
///
/// let report = MetricsReport { window: None, number_of_commits: 0, records: vec![] };
/// assert!(report.to_markdown().contains("No files found."));
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    /// Effective churn window; `None` when the repository has no commits.
    pub window: Option<WindowChoice>,
    /// Commits listed by the churn query.
    pub number_of_commits: u64,
    /// One record per file, in inventory order.
    pub records: Vec<MetricRecord>,
}

impl MetricsReport {
    /// Records wrapped as generic per-file findings.
    pub fn findings(&self) -> Vec<FileFinding> {
        self.records.iter().cloned().map(FileFinding::from).collect()
    }

    /// Render the report as a Markdown table.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("# File Metrics\n\n");
        out.push_str(&format!("**Commits in churn window:** {}\n\n", self.number_of_commits));
        if let Some(choice) = &self.window {
            out.push_str(&format!(
                "**Window:** {:?} ({} → {})\n\n",
                choice.kind,
                choice.window.oldest_timestamp.to_rfc3339(),
                choice.window.latest_timestamp.to_rfc3339(),
            ));
        }

        if self.records.is_empty() {
            out.push_str("No files found.\n");
            return out;
        }

        out.push_str("| File | LoC | Last commit | Occurrence | Additions | Deletions |\n");
        out.push_str("|------|-----|-------------|------------|-----------|-----------|\n");
        for r in &self.records {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} | {} | {} |\n",
                r.path,
                r.lines_of_code.map_or_else(|| "-".to_string(), |n| n.to_string()),
                if r.last_committed_at.is_empty() { "-" } else { r.last_committed_at.as_str() },
                r.occurrence,
                r.additions,
                r.deletions,
            ));
        }
        out
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .records
            .iter()
            .map(|r| r.path.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        writeln!(
            f,
            "{:<width$}  {:>7}  {:<25}  {:>5}  {:>7}  {:>7}",
            "PATH", "LOC", "LAST COMMIT", "OCC", "ADD", "DEL"
        )?;
        for r in &self.records {
            let loc = r
                .lines_of_code
                .map_or_else(|| "-".to_string(), |n| n.to_string());
            let last = if r.last_committed_at.is_empty() {
                "-"
            } else {
                r.last_committed_at.as_str()
            };
            writeln!(
                f,
                "{:<width$}  {:>7}  {:<25}  {:>5}  {:>7}  {:>7}",
                r.path, loc, last, r.occurrence, r.additions, r.deletions
            )?;
        }
        writeln!(
            f,
            "\n{} files, {} commits in churn window",
            self.records.len(),
            self.number_of_commits
        )
    }
}

/// Compute metrics for the working tree rooted at `root`.
///
/// Runs, in order: inventory walk, text classification, line counting,
/// last-commit scan, window selection and churn aggregation. A repository
/// without commits yields blank timestamps and no churn.
///
/// # Errors
///
/// Any failing query aborts the whole computation; see the individual
/// components for the specific conditions.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use fileinfo_core::FileinfoConfig;
/// use fileinfo_history::metrics::analyze;
///
/// let report = analyze(Path::new("."), &FileinfoConfig::default()).unwrap();
/// for r in &report.records {
///     println!("{}: {:?} lines", r.path, r.lines_of_code);
/// }
/// ```
pub fn analyze(root: &Path, config: &FileinfoConfig) -> Result<MetricsReport, FileinfoError> {
    let state = repo::probe(root)?;
    if state.is_shallow {
        warn!("repository is a shallow clone; history metrics cover only the fetched commits");
    }

    let runner = ToolRunner::new(root);
    if state.has_commits && config.scan.commit_graph {
        write_commit_graph(&runner);
    }

    let inventory = walk_inventory(root)?;
    info!(files = inventory.len(), "collected file inventory");

    let text_files = classify_text_files(&runner, &inventory, config.scan.batch_size)?;
    let line_count = count_lines(&runner, &text_files, config.scan.batch_size)?;

    let (last_commits, window, churn) = if state.has_commits {
        let last_commits = scan_last_commits(&runner, &inventory)?;
        let window = select_churn_window(&runner, &config.churn)?;
        let churn = aggregate_churn(&runner, &window.window)?;
        (last_commits, Some(window), churn)
    } else {
        info!("repository has no commits; skipping history analysis");
        let blank: LastCommitMap = inventory.iter().map(|p| (p.to_string(), String::new())).collect();
        (blank, None, ChurnTotals::default())
    };

    Ok(MetricsReport {
        window,
        number_of_commits: churn.number_of_commits,
        records: assemble(&inventory, &line_count, &last_commits, &churn),
    })
}

/// Join the per-component maps into one record per inventory path.
///
/// Missing churn becomes an all-zero record; a missing line count stays
/// `None`; a missing timestamp becomes `""`.
pub fn assemble(
    inventory: &FileInventory,
    line_count: &LineCount,
    last_commits: &LastCommitMap,
    churn: &ChurnTotals,
) -> Vec<MetricRecord> {
    inventory
        .iter()
        .map(|path| {
            let c = churn.get(path).unwrap_or_default();
            MetricRecord {
                path: path.to_string(),
                lines_of_code: line_count.get(path).copied(),
                last_committed_at: last_commits.get(path).cloned().unwrap_or_default(),
                number_of_commits: churn.number_of_commits,
                occurrence: c.occurrence,
                additions: c.additions,
                deletions: c.deletions,
            }
        })
        .collect()
}

fn write_commit_graph(runner: &ToolRunner) {
    info!("generating commit-graph cache");
    if let Err(e) = runner.git(&["commit-graph", "write", "--reachable", "--changed-paths"]) {
        warn!(error = %e, "could not write commit-graph; continuing without it");
    }
}
