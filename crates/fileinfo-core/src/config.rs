use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::FileinfoError;

/// Top-level configuration loaded from `.fileinfo.toml`.
///
/// Every section is optional; omitted keys take their defaults.
///
/// # Examples
///
/// ```
/// use fileinfo_core::FileinfoConfig;
///
/// let config = FileinfoConfig::default();
/// assert_eq!(config.churn.window_commits, 100);
/// assert_eq!(config.churn.window_days, 90);
/// assert_eq!(config.scan.batch_size, 1000);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileinfoConfig {
    /// Churn window settings.
    #[serde(default)]
    pub churn: ChurnConfig,
    /// Working tree and subprocess settings.
    #[serde(default)]
    pub scan: ScanConfig,
}

impl FileinfoConfig {
    /// Load configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FileinfoError::FileNotFound`] if `path` does not exist,
    /// [`FileinfoError::Toml`] if the content is not valid TOML, or
    /// [`FileinfoError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fileinfo_core::FileinfoConfig;
    /// use std::path::Path;
    ///
    /// let config = FileinfoConfig::from_file(Path::new(".fileinfo.toml")).unwrap();
    /// ```
    pub fn from_file(path: &Path) -> Result<Self, FileinfoError> {
        if !path.exists() {
            return Err(FileinfoError::FileNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`FileinfoError::Toml`] if parsing fails, or
    /// [`FileinfoError::Config`] if a value is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use fileinfo_core::FileinfoConfig;
    ///
    /// let toml = r#"
    /// [churn]
    /// window_days = 30
    /// "#;
    /// let config = FileinfoConfig::from_toml(toml).unwrap();
    /// assert_eq!(config.churn.window_days, 30);
    /// assert_eq!(config.churn.window_commits, 100);
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, FileinfoError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), FileinfoError> {
        if self.churn.window_commits == 0 {
            return Err(FileinfoError::Config(
                "churn.window_commits must be at least 1".into(),
            ));
        }
        if self.churn.window_days == 0 {
            return Err(FileinfoError::Config(
                "churn.window_days must be at least 1".into(),
            ));
        }
        if self.scan.batch_size == 0 {
            return Err(FileinfoError::Config(
                "scan.batch_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Bounds of the two candidate churn windows.
///
/// # Examples
///
/// ```
/// use fileinfo_core::ChurnConfig;
///
/// let config = ChurnConfig::default();
/// assert_eq!(config.window_commits, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurnConfig {
    /// Size of the count window, in commits (default: 100).
    #[serde(default = "default_window_commits")]
    pub window_commits: usize,
    /// Span of the time window, in days before the newest commit (default: 90).
    #[serde(default = "default_window_days")]
    pub window_days: u32,
}

fn default_window_commits() -> usize {
    100
}

fn default_window_days() -> u32 {
    90
}

impl Default for ChurnConfig {
    fn default() -> Self {
        Self {
            window_commits: default_window_commits(),
            window_days: default_window_days(),
        }
    }
}

/// Subprocess and repository scanning settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Paths passed per `git ls-files` / `wc` invocation (default: 1000).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Write the commit-graph cache before reading history (default: true).
    #[serde(default = "default_commit_graph")]
    pub commit_graph: bool,
}

fn default_batch_size() -> usize {
    1000
}

fn default_commit_graph() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            commit_graph: default_commit_graph(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = FileinfoConfig::default();
        assert_eq!(config.churn.window_commits, 100);
        assert_eq!(config.churn.window_days, 90);
        assert_eq!(config.scan.batch_size, 1000);
        assert!(config.scan.commit_graph);
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[churn]
window_commits = 250
window_days = 180

[scan]
batch_size = 200
commit_graph = false
"#;
        let config = FileinfoConfig::from_toml(toml).unwrap();
        assert_eq!(config.churn.window_commits, 250);
        assert_eq!(config.churn.window_days, 180);
        assert_eq!(config.scan.batch_size, 200);
        assert!(!config.scan.commit_graph);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config = FileinfoConfig::from_toml("").unwrap();
        assert_eq!(config.churn.window_commits, 100);
        assert_eq!(config.scan.batch_size, 1000);
    }

    #[test]
    fn invalid_toml_returns_error() {
        let result = FileinfoConfig::from_toml("{{invalid}}");
        assert!(matches!(result, Err(FileinfoError::Toml(_))));
    }

    #[test]
    fn zero_values_are_rejected() {
        for toml in [
            "[churn]\nwindow_commits = 0\n",
            "[churn]\nwindow_days = 0\n",
            "[scan]\nbatch_size = 0\n",
        ] {
            let result = FileinfoConfig::from_toml(toml);
            assert!(
                matches!(result, Err(FileinfoError::Config(_))),
                "expected config error for {toml:?}"
            );
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let result = FileinfoConfig::from_file(Path::new("/nonexistent/.fileinfo.toml"));
        assert!(matches!(result, Err(FileinfoError::FileNotFound(_))));
    }
}
