//! Configuration file parsing for .varsight.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::MAX_DEPTH;

/// Main configuration structure for .varsight.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VarsightConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub ignore: IgnoreConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Traversal depth bound. Clamped to the built-in safety ceiling.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Paths to exclude from discovery (gitignore syntax)
    #[serde(default = "default_ignore_paths")]
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "terminal" or "json"
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable color output
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_max_depth() -> u32 {
    MAX_DEPTH
}

fn default_ignore_paths() -> Vec<String> {
    vec!["bin/".to_string(), "obj/".to_string()]
}

fn default_format() -> String {
    "terminal".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            paths: default_ignore_paths(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            color: default_true(),
        }
    }
}

impl VarsightConfig {
    /// Load `.varsight.toml` from `dir`, falling back to defaults when the
    /// file does not exist.
    pub fn find_and_load(dir: &Path) -> Result<Self> {
        let path = dir.join(".varsight.toml");
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.analysis.max_depth = config.analysis.max_depth.min(MAX_DEPTH);
        Ok(config)
    }

    /// Write this configuration to `path` as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
