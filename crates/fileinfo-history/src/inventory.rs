//! Enumeration of the files currently present in a working tree.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

use fileinfo_core::FileinfoError;
use tracing::warn;

/// Ordered, duplicate-free list of file paths relative to the repository root.
///
/// Built once per run and never modified afterwards. Paths use `/` as the
/// separator, matching what git prints.
///
/// # Examples
///
/// ```
/// use fileinfo_history::inventory::FileInventory;
///
/// let inv = FileInventory::from_paths(["b.rs", "a.rs", "b.rs"]);
/// assert_eq!(inv.len(), 2);
/// assert_eq!(inv.paths(), ["b.rs", "a.rs"]);
/// assert!(inv.contains("a.rs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileInventory {
    paths: Vec<String>,
    index: HashSet<String>,
}

impl FileInventory {
    /// Build an inventory from explicit paths, keeping the first occurrence of each.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inventory = Self::default();
        for path in paths {
            let path = path.into();
            if inventory.index.insert(path.clone()) {
                inventory.paths.push(path);
            }
        }
        inventory
    }

    /// Paths in enumeration order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether `path` is part of the inventory.
    pub fn contains(&self, path: &str) -> bool {
        self.index.contains(path)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// `true` when the working tree holds no files.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the paths in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Walk the working tree at `root` and list every regular file.
///
/// Hidden files and git-ignored files are included; `.git` directories are
/// not. Symlinks are included when they point at a regular file. The
/// result is sorted by path.
///
/// # Errors
///
/// Returns [`FileinfoError::FileNotFound`] if `root` does not exist.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use fileinfo_history::inventory::walk_inventory;
///
/// let inventory = walk_inventory(Path::new(".")).unwrap();
/// println!("{} files", inventory.len());
/// ```
pub fn walk_inventory(root: &Path) -> Result<FileInventory, FileinfoError> {
    if !root.is_dir() {
        return Err(FileinfoError::FileNotFound(root.to_path_buf()));
    }

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .filter_entry(|entry| entry.file_name() != OsStr::new(".git"))
        .build();

    let mut paths = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        paths.push(to_slash(relative));
    }

    paths.sort();
    Ok(FileInventory::from_paths(paths))
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walk_skips_git_metadata_and_keeps_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join(".git/objects")).unwrap();
        std::fs::write(root.join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();
        std::fs::create_dir_all(root.join("src/nested")).unwrap();
        std::fs::write(root.join("src/nested/lib.rs"), "fn x() {}\n").unwrap();
        std::fs::write(root.join(".gitignore"), "target/\n").unwrap();
        std::fs::write(root.join("README.md"), "# hi\n").unwrap();

        let inventory = walk_inventory(root).unwrap();
        assert_eq!(
            inventory.paths(),
            [".gitignore", "README.md", "src/nested/lib.rs"]
        );
        assert!(!inventory.iter().any(|p| p.starts_with(".git/")));
    }

    #[test]
    fn ignored_files_are_still_listed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join(".gitignore"), "*.log\n").unwrap();
        std::fs::write(root.join("debug.log"), "x\n").unwrap();

        let inventory = walk_inventory(root).unwrap();
        assert!(inventory.contains("debug.log"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let err = walk_inventory(Path::new("/nonexistent/fileinfo-root")).unwrap_err();
        assert!(matches!(err, FileinfoError::FileNotFound(_)));
    }

    #[test]
    fn from_paths_deduplicates_in_order() {
        let inv = FileInventory::from_paths(vec!["z", "a", "z", "m"]);
        assert_eq!(inv.paths(), ["z", "a", "m"]);
        assert!(!inv.is_empty());
    }
}
