//! Line counts for text files via `wc -l`.

use std::collections::HashMap;

use fileinfo_core::FileinfoError;
use tracing::{debug, info};

use crate::classify::TextFileSet;
use crate::command::ToolRunner;

/// Path → number of lines. Absent paths were not counted.
pub type LineCount = HashMap<String, u64>;

/// Count lines of every text file, `batch_size` paths per `wc` call.
///
/// # Errors
///
/// Returns [`FileinfoError::Command`] if `wc` fails for a batch, or
/// [`FileinfoError::Parse`] if its output has a non-numeric count.
pub fn count_lines(
    runner: &ToolRunner,
    text_files: &TextFileSet,
    batch_size: usize,
) -> Result<LineCount, FileinfoError> {
    info!(files = text_files.len(), "analyzing lines of code");

    let paths: Vec<&str> = text_files.iter().map(String::as_str).collect();
    let mut counts = LineCount::with_capacity(paths.len());
    for batch in paths.chunks(batch_size.max(1)) {
        let stdout = runner.run("wc", &["-l"], batch)?;
        let parsed = parse_wc_output(&stdout, batch.len())?;
        debug!(queried = batch.len(), counted = parsed.len(), "counted batch");
        counts.extend(parsed.into_iter().map(|(path, n)| (path.to_string(), n)));
    }

    Ok(counts)
}

/// Parse `wc -l` output produced for `input_count` files.
///
/// `wc` appends a `<N> total` line only when given more than one file, so
/// the trailing line is dropped only in that case; a lone file named
/// `total` is kept.
///
/// # Errors
///
/// Returns [`FileinfoError::Parse`] if a line does not start with a count.
///
/// # Examples
///
/// ```
/// use fileinfo_history::loc::parse_wc_output;
///
/// let out = "  12 src/main.rs\n   0 empty.txt\n  12 total\n";
/// let counts = parse_wc_output(out, 2).unwrap();
/// assert_eq!(counts, vec![("src/main.rs", 12), ("empty.txt", 0)]);
/// ```
pub fn parse_wc_output(stdout: &str, input_count: usize) -> Result<Vec<(&str, u64)>, FileinfoError> {
    let mut lines: Vec<&str> = stdout.lines().filter(|l| !l.trim().is_empty()).collect();

    if input_count > 1 && lines.last().is_some_and(|l| is_total_line(l)) {
        lines.pop();
    }

    lines.into_iter().map(parse_wc_line).collect()
}

fn is_total_line(line: &str) -> bool {
    line.trim_start()
        .split_once(' ')
        .is_some_and(|(count, rest)| {
            count.chars().all(|c| c.is_ascii_digit()) && rest == "total"
        })
}

// The count is left-padded; exactly one space separates it from the path.
fn parse_wc_line(line: &str) -> Result<(&str, u64), FileinfoError> {
    let (count, path) = line
        .trim_start()
        .split_once(' ')
        .ok_or_else(|| FileinfoError::Parse(format!("unexpected wc output: {line:?}")))?;
    let count = count
        .parse()
        .map_err(|e| FileinfoError::Parse(format!("unexpected wc count in {line:?}: {e}")))?;
    Ok((path, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_file_has_no_total_line() {
        let counts = parse_wc_output("5 a.txt\n", 1).unwrap();
        assert_eq!(counts, vec![("a.txt", 5)]);
    }

    #[test]
    fn lone_file_named_total_is_kept() {
        let counts = parse_wc_output("3 total\n", 1).unwrap();
        assert_eq!(counts, vec![("total", 3)]);
    }

    #[test]
    fn file_named_total_among_many_is_kept() {
        let out = " 3 total\n 4 b.txt\n 7 total\n";
        let counts = parse_wc_output(out, 2).unwrap();
        assert_eq!(counts, vec![("total", 3), ("b.txt", 4)]);
    }

    #[test]
    fn empty_file_counts_as_zero() {
        let counts = parse_wc_output(" 0 empty.txt\n 2 x\n 2 total\n", 2).unwrap();
        assert_eq!(counts[0], ("empty.txt", 0));
    }

    #[test]
    fn path_with_spaces_keeps_everything_after_count() {
        let counts = parse_wc_output("10 docs/release notes.md\n", 1).unwrap();
        assert_eq!(counts, vec![("docs/release notes.md", 10)]);
    }

    #[test]
    fn leading_space_in_path_is_kept() {
        let out = " 2  lead.txt\n 1 x.txt\n 3 total\n";
        let counts = parse_wc_output(out, 2).unwrap();
        assert_eq!(counts, vec![(" lead.txt", 2), ("x.txt", 1)]);
    }

    #[test]
    fn garbage_count_is_an_error() {
        assert!(matches!(
            parse_wc_output("lots a.txt\n", 1),
            Err(FileinfoError::Parse(_))
        ));
    }
}
