use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier attached to every [`FileFinding`].
pub const FINDING_ID: &str = "metrics_fileinfo";

/// Size, recency and churn metrics for one file in the working tree.
///
/// `number_of_commits` is the size of the churn window and is the same
/// for every record of a run.
///
/// # Examples
///
/// ```
/// use fileinfo_core::MetricRecord;
///
/// let record = MetricRecord {
///     path: "src/main.rs".into(),
///     lines_of_code: Some(120),
///     last_committed_at: "2024-01-01T00:00:00+00:00".into(),
///     number_of_commits: 42,
///     occurrence: 3,
///     additions: 40,
///     deletions: 12,
/// };
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["linesOfCode"], 120);
/// assert_eq!(json["numberOfCommits"], 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRecord {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    /// Line count; `None` when the file is binary or was not counted.
    pub lines_of_code: Option<u64>,
    /// Author date of the newest commit touching the file, or `""` if none.
    pub last_committed_at: String,
    /// Commits in the churn window.
    pub number_of_commits: u64,
    /// Commits in the window that touched this file.
    pub occurrence: u64,
    /// Lines added to this file within the window.
    pub additions: u64,
    /// Lines removed from this file within the window.
    pub deletions: u64,
}

/// A [`MetricRecord`] wrapped as a generic per-file finding.
///
/// # Examples
///
/// ```
/// use fileinfo_core::{FileFinding, MetricRecord};
///
/// let record = MetricRecord {
///     path: "logo.png".into(),
///     lines_of_code: None,
///     last_committed_at: "".into(),
///     number_of_commits: 0,
///     occurrence: 0,
///     additions: 0,
///     deletions: 0,
/// };
/// let finding = FileFinding::from(record);
/// assert_eq!(finding.id, "metrics_fileinfo");
/// assert_eq!(finding.message, "logo.png: loc = (no info), last commit datetime = ");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFinding {
    /// Path the finding is attached to.
    pub path: String,
    /// Always [`FINDING_ID`].
    pub id: String,
    /// One-line human summary.
    pub message: String,
    /// The metric payload.
    pub object: MetricRecord,
}

impl From<MetricRecord> for FileFinding {
    fn from(record: MetricRecord) -> Self {
        let loc = record
            .lines_of_code
            .map_or_else(|| "(no info)".to_string(), |n| n.to_string());
        Self {
            path: record.path.clone(),
            id: FINDING_ID.to_string(),
            message: format!(
                "{}: loc = {loc}, last commit datetime = {}",
                record.path, record.last_committed_at
            ),
            object: record,
        }
    }
}

/// Output format for CLI subcommands.
///
/// Implements [`FromStr`] so it can be used directly with `clap` argument parsing.
///
/// # Examples
///
/// ```
/// use fileinfo_core::OutputFormat;
///
/// let fmt: OutputFormat = "json".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Json);
///
/// let fmt: OutputFormat = "md".parse().unwrap();
/// assert_eq!(fmt, OutputFormat::Markdown);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// Machine-readable JSON with camelCase keys.
    Json,
    /// Markdown table.
    Markdown,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
