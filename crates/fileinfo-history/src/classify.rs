//! Text/binary classification from the index's line-ending attributes.
//!
//! Uses `git ls-files --eol`, which reports for each tracked file the
//! line-ending class git detected in the index (`i/...`) and in the
//! working tree (`w/...`). A working-tree class of `-text` means git
//! considers the content binary.

use std::collections::BTreeSet;

use fileinfo_core::FileinfoError;
use tracing::{debug, info};

use crate::command::ToolRunner;
use crate::inventory::FileInventory;

/// Working-tree eol class git assigns to binary content.
pub const BINARY_MARKER: &str = "w/-text";

/// Tracked paths whose content is text.
pub type TextFileSet = BTreeSet<String>;

/// One parsed `git ls-files --eol -z` record.
///
/// # Examples
///
/// ```
/// use fileinfo_history::classify::parse_eol_record;
///
/// let rec = parse_eol_record("i/lf    w/lf    attr/text eol=lf \tsrc/main.rs").unwrap();
/// assert_eq!(rec.path, "src/main.rs");
/// assert!(rec.is_text);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EolRecord<'a> {
    /// Path relative to the repository root.
    pub path: &'a str,
    /// `false` when the working-tree class is [`BINARY_MARKER`].
    pub is_text: bool,
}

/// Classify the inventory, querying git in chunks of `batch_size` paths.
///
/// Untracked paths make `git ls-files --error-unmatch` fail, and that
/// failure aborts classification.
///
/// # Errors
///
/// Returns [`FileinfoError::Command`] if any batch query fails.
pub fn classify_text_files(
    runner: &ToolRunner,
    inventory: &FileInventory,
    batch_size: usize,
) -> Result<TextFileSet, FileinfoError> {
    info!(files = inventory.len(), "classifying text files");

    let mut text_files = TextFileSet::new();
    for (n, batch) in inventory.paths().chunks(batch_size.max(1)).enumerate() {
        let paths: Vec<&str> = batch.iter().map(String::as_str).collect();
        let stdout = runner.git_with_paths(&["ls-files", "--eol", "--error-unmatch", "-z"], &paths)?;
        let before = text_files.len();
        text_files.extend(
            parse_eol_output(&stdout)
                .filter(|rec| rec.is_text)
                .map(|rec| rec.path.to_string()),
        );
        debug!(
            batch = n,
            queried = batch.len(),
            text = text_files.len() - before,
            "classified batch"
        );
    }

    Ok(text_files)
}

/// Parse NUL-terminated `git ls-files --eol -z` output.
///
/// Records without a tab-separated path are skipped.
pub fn parse_eol_output(stdout: &str) -> impl Iterator<Item = EolRecord<'_>> {
    stdout
        .split('\0')
        .filter(|line| !line.is_empty())
        .filter_map(parse_eol_record)
}

/// Parse one `<i/eol> <w/eol> <attr>\t<path>` record.
///
/// The attribute column may itself contain spaces (`attr/text eol=lf`), so
/// only the first two whitespace-delimited fields are taken from the
/// left-hand side and the remainder is ignored.
pub fn parse_eol_record(line: &str) -> Option<EolRecord<'_>> {
    let (fields, path) = line.split_once('\t')?;
    let mut columns = fields.split_whitespace();
    let _index_eol = columns.next();
    let worktree_eol = columns.next();

    Some(EolRecord {
        path,
        is_text: worktree_eol != Some(BINARY_MARKER),
    })
}
