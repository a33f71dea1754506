use std::path::PathBuf;

/// Errors that can occur while computing file metrics.
///
/// Every variant is fatal for the run it occurs in: a metric set is
/// either computed completely or not at all. Variants carry `miette`
/// codes and hints so the binary can render them directly.
///
/// # Examples
///
/// ```
/// use fileinfo_core::FileinfoError;
///
/// let err = FileinfoError::Config("window_commits must be at least 1".into());
/// assert!(err.to_string().contains("window_commits"));
/// ```
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum FileinfoError {
    /// Filesystem I/O failure, including failure to spawn a process.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    #[diagnostic(code(fileinfo::config))]
    Config(String),

    /// Repository could not be opened or inspected.
    #[error("git error: {0}")]
    #[diagnostic(
        code(fileinfo::git),
        help("run fileinfo at the top of a git working tree, or pass --path")
    )]
    Git(String),

    /// An external command exited with a failure status.
    #[error("`{command}` failed ({status}): {stderr}")]
    #[diagnostic(code(fileinfo::command))]
    Command {
        /// Program and arguments, space-joined (path lists elided).
        command: String,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// Tool output could not be interpreted.
    #[error("parse error: {0}")]
    #[diagnostic(code(fileinfo::parse))]
    Parse(String),

    /// JSON serialization / deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML deserialization failure.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A required file was not found.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FileinfoError = io_err.into();
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn command_error_names_program_and_stderr() {
        let err = FileinfoError::Command {
            command: "git log --numstat".into(),
            status: "exit status: 128".into(),
            stderr: "fatal: bad revision".into(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("`git log --numstat` failed"));
        assert!(msg.contains("exit status: 128"));
        assert!(msg.ends_with("fatal: bad revision"));
    }

    #[test]
    fn file_not_found_shows_path() {
        let err = FileinfoError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert!(err.to_string().contains("/tmp/missing.toml"));
    }
}
