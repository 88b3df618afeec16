//! Pipeline configuration loading and management.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::records::RecordSource;

/// Project-relative location of the configuration file.
pub const CONFIG_PATH: &str = ".ambitions/config.yaml";

/// Prefix shared by every localization source.
pub const TEXT_SOURCE_PREFIX: &str = "text-";

/// Main configuration, loaded from .ambitions/config.yaml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Version stamped into the output document
    #[serde(default = "default_version")]
    pub version: String,

    /// Directory holding the reference XML sources (relative to project root)
    #[serde(default = "default_reference_dir")]
    pub reference_dir: PathBuf,

    /// Output document path (relative to project root)
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Language field read from text sources
    #[serde(default = "default_language")]
    pub language: String,

    /// Text sources in load order; empty means every `text-*.xml`, sorted
    #[serde(default)]
    pub text_sources: Vec<String>,

    #[serde(default)]
    pub engine: EngineConfig,
}

/// Interactive engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Delay before a search edit is applied
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

fn default_version() -> String {
    "1.0".to_string()
}
fn default_reference_dir() -> PathBuf {
    PathBuf::from("Reference/XML/Infos")
}
fn default_output() -> PathBuf {
    PathBuf::from("viewer/data/ambitions.json")
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_search_debounce_ms() -> u64 {
    200
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl EngineConfig {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            reference_dir: default_reference_dir(),
            output: default_output(),
            language: default_language(),
            text_sources: Vec::new(),
            engine: EngineConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Load from project root (looks for .ambitions/config.yaml)
    pub fn load_from_project(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_PATH);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve paths relative to project root
    pub fn resolve_paths(&mut self, project_root: &Path) {
        self.reference_dir = project_root.join(&self.reference_dir);
        self.output = project_root.join(&self.output);
    }

    /// Text sources to load, in order.
    pub fn text_source_names(&self, source: &dyn RecordSource) -> Vec<String> {
        if self.text_sources.is_empty() {
            source.source_names(TEXT_SOURCE_PREFIX)
        } else {
            self.text_sources.clone()
        }
    }

    /// Write this configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}
