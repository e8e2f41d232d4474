//! Per-project configuration loaded from `taskmirror.toml`.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

const CONFIG_FILE: &str = "taskmirror.toml";

/// Top-level configuration for one mirrored project.
///
/// A missing file yields the defaults; a present-but-malformed file is an
/// error so typos never silently disable sync.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    /// Sync behavior.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Correlation behavior.
    #[serde(default)]
    pub correlation: CorrelationConfig,
}

/// `[sync]` block.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SyncConfig {
    /// Whether to keep a realtime watch on the task file after the initial
    /// load.
    #[serde(default = "default_realtime")]
    pub realtime: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            realtime: default_realtime(),
        }
    }
}

const fn default_realtime() -> bool {
    true
}

/// `[correlation]` block.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct CorrelationConfig {
    /// Whether commits without explicit task references fall back to the
    /// semantic strategy.
    #[serde(default)]
    pub semantic: bool,
}

impl ProjectConfig {
    /// Load configuration from `<project>/taskmirror.toml`.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed.
    pub fn load(project: impl AsRef<Path>) -> Result<Self> {
        let path = project.as_ref().join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let config = ProjectConfig::load(dir.path()).expect("load");
        assert!(config.sync.realtime);
        assert!(!config.correlation.semantic);
    }

    #[test]
    fn partial_file_keeps_unmentioned_defaults() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(CONFIG_FILE), "[correlation]\nsemantic = true\n")
            .expect("write config");

        let config = ProjectConfig::load(dir.path()).expect("load");
        assert!(config.sync.realtime);
        assert!(config.correlation.semantic);
    }

    #[test]
    fn full_file_overrides_everything() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[sync]\nrealtime = false\n\n[correlation]\nsemantic = true\n",
        )
        .expect("write config");

        let config = ProjectConfig::load(dir.path()).expect("load");
        assert!(!config.sync.realtime);
        assert!(config.correlation.semantic);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join(CONFIG_FILE), "sync = nonsense").expect("write config");

        let err = ProjectConfig::load(dir.path());
        assert!(err.is_err());
    }
}
