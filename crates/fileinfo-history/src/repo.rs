//! Repository state probe via git2.

use std::path::Path;

use fileinfo_core::FileinfoError;
use git2::{ErrorCode, Repository};

/// What the metric run needs to know about a repository before querying it.
///
/// # Examples
///
/// ```
/// use fileinfo_history::repo::RepoState;
///
/// let state = RepoState { has_commits: false, is_shallow: false };
/// assert!(!state.has_commits);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoState {
    /// `false` when HEAD is unborn (no commit exists yet).
    pub has_commits: bool,
    /// `true` for a shallow clone, whose history is truncated.
    pub is_shallow: bool,
}

/// Open the repository whose working tree is rooted at `root`.
///
/// # Errors
///
/// Returns [`FileinfoError::Git`] if `root` is not the top of a
/// non-bare git working tree, or if HEAD cannot be resolved.
pub fn probe(root: &Path) -> Result<RepoState, FileinfoError> {
    let repo = Repository::open(root)
        .map_err(|e| FileinfoError::Git(format!("failed to open repository: {e}")))?;

    if repo.is_bare() {
        return Err(FileinfoError::Git(format!(
            "{} is a bare repository; a working tree is required",
            root.display()
        )));
    }

    let has_commits = match repo.head() {
        Ok(_) => true,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => false,
        Err(e) => return Err(FileinfoError::Git(format!("failed to resolve HEAD: {e}"))),
    };

    Ok(RepoState {
        has_commits,
        is_shallow: repo.is_shallow(),
    })
}
