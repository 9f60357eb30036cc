//! Run configuration for repeated checks.
//!
//! Lets a repository pin its catalogue and descriptor locations instead of
//! passing them on every invocation. Command-line flags override each value.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! apis: listApis.json
//! sources:
//!   - descriptors/
//! jobs: 4
//! log_level: info
//! format: text
//! ```

use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Line-oriented text report.
    #[default]
    Text,
    /// Serialized report for tooling.
    Json,
}

/// Top-level run configuration.
///
/// # Examples
///
/// ```
/// # use apicheck_loader::{CheckConfig, OutputFormat};
/// let config: CheckConfig = serde_yaml::from_str("version: \"1.0\"\napis: apis.json\n").unwrap();
/// assert_eq!(config.apis.as_deref(), Some(std::path::Path::new("apis.json")));
/// assert!(config.sources.is_empty());
/// assert_eq!(config.format, OutputFormat::Text);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Catalogue file (`listApis` response).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apis: Option<PathBuf>,
    /// Descriptor files or directories.
    #[serde(default)]
    pub sources: Vec<PathBuf>,
    /// Matching threads (`None` = one per CPU).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
    /// Log filter used when `RUST_LOG` is unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default)]
    pub format: OutputFormat,
}

impl CheckConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Relative `apis` and `sources` paths are resolved against the
    /// directory containing the file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoadError::IoError) if the file cannot be
    /// read, or [`YamlError`](crate::LoadError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config: Self = serde_yaml::from_reader(reader)?;

        match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => Ok(config.relative_to(base)),
            _ => Ok(config),
        }
    }

    /// Resolves relative input paths against `base`.
    pub fn relative_to(mut self, base: &Path) -> Self {
        self.apis = self.apis.map(|apis| base.join(apis));
        self.sources = self
            .sources
            .into_iter()
            .map(|source| base.join(source))
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_yaml() -> &'static str {
        r#"
version: "1.0"
apis: listApis.json
sources:
  - descriptors/
  - /abs/extra.json
jobs: 8
log_level: debug
format: json
"#
    }

    #[test]
    fn test_deserialize_complete() {
        let config: CheckConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.apis, Some(PathBuf::from("listApis.json")));
        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.jobs, Some(8));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn test_deserialize_minimal() {
        let config: CheckConfig = serde_yaml::from_str("version: \"1.0\"\n").unwrap();
        assert!(config.apis.is_none());
        assert!(config.sources.is_empty());
        assert!(config.jobs.is_none());
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let result: std::result::Result<CheckConfig, _> =
            serde_yaml::from_str("version: \"1.0\"\nformat: xml\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_relative_to_keeps_absolute_paths() {
        let config: CheckConfig = serde_yaml::from_str(sample_yaml()).unwrap();
        let resolved = config.relative_to(Path::new("/repo"));

        assert_eq!(resolved.apis, Some(PathBuf::from("/repo/listApis.json")));
        assert_eq!(resolved.sources[0], PathBuf::from("/repo/descriptors/"));
        assert_eq!(resolved.sources[1], PathBuf::from("/abs/extra.json"));
    }

    #[test]
    fn test_load_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apicheck.yml");
        std::fs::write(&path, sample_yaml()).unwrap();

        let loaded = CheckConfig::load(&path).unwrap();
        assert_eq!(loaded.apis, Some(dir.path().join("listApis.json")));
        assert_eq!(loaded.sources[1], PathBuf::from("/abs/extra.json"));
        assert_eq!(loaded.format, OutputFormat::Json);
    }
}
