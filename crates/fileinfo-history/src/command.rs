//! Blocking subprocess execution rooted at the working tree.
//!
//! Every invocation runs to completion; there is no timeout and no retry.
//! A non-zero exit status is always an error.

use std::path::{Path, PathBuf};
use std::process::Command;

use fileinfo_core::FileinfoError;
use tracing::debug;

/// Runs `git` and other command line tools inside a repository.
///
/// # Examples
///
/// ```
/// use fileinfo_history::command::ToolRunner;
///
/// let runner = ToolRunner::new("/tmp/repo");
/// assert_eq!(runner.root().to_str(), Some("/tmp/repo"));
/// ```
#[derive(Debug, Clone)]
pub struct ToolRunner {
    root: PathBuf,
}

impl ToolRunner {
    /// Create a runner whose commands execute with `root` as working directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Working directory of every command.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run `git <args>` and return its standard output.
    ///
    /// Paths are never quoted in the output (`core.quotePath=false`).
    ///
    /// # Errors
    ///
    /// Returns [`FileinfoError::Io`] if `git` cannot be spawned, or
    /// [`FileinfoError::Command`] if it exits unsuccessfully.
    pub fn git(&self, args: &[&str]) -> Result<String, FileinfoError> {
        self.git_with_paths(args, &[])
    }

    /// Run `git <args> -- <paths...>` and return its standard output.
    ///
    /// # Errors
    ///
    /// Same as [`ToolRunner::git`].
    pub fn git_with_paths(&self, args: &[&str], paths: &[&str]) -> Result<String, FileinfoError> {
        let mut full = vec!["-c", "core.quotePath=false"];
        full.extend_from_slice(args);
        self.run("git", &full, paths)
    }

    /// Run `program <args> -- <paths...>` and return its standard output.
    ///
    /// The `--` separator is only added when `paths` is non-empty, so a
    /// file named like an option is never mistaken for one.
    ///
    /// # Errors
    ///
    /// Returns [`FileinfoError::Io`] if the program cannot be spawned, or
    /// [`FileinfoError::Command`] if it exits unsuccessfully.
    pub fn run(&self, program: &str, args: &[&str], paths: &[&str]) -> Result<String, FileinfoError> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .current_dir(&self.root)
            // wc prints a localized "total" line otherwise.
            .env("LC_ALL", "C");
        if !paths.is_empty() {
            cmd.arg("--").args(paths);
        }

        let described = describe(program, args, paths.len());
        debug!(command = %described, "running");

        let output = cmd.output()?;
        if !output.status.success() {
            return Err(FileinfoError::Command {
                command: described,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn describe(program: &str, args: &[&str], path_count: usize) -> String {
    let mut parts = Vec::with_capacity(args.len() + 2);
    parts.push(program.to_string());
    parts.extend(args.iter().map(|a| a.to_string()));
    if path_count > 0 {
        parts.push(format!("-- <{path_count} paths>"));
    }
    parts.join(" ")
}
