//! Configuration for one pipeline run
//!
//! Loaded from TOML, then adjusted by environment variables. Every field has a
//! default, so an empty or missing file is a valid configuration.

use crate::history::DEFAULT_CAPACITY;
use crate::llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MODEL};
use crate::llm::{CompletionOptions, OllamaConfig};
use crate::stages::StageSet;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Canonical number of whole-chain attempts per run
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

pub const ENV_MODEL: &str = "DINNER_DECIDER_MODEL";
pub const ENV_ENDPOINT: &str = "DINNER_DECIDER_ENDPOINT";
pub const ENV_HISTORY: &str = "DINNER_DECIDER_HISTORY";

const APP_DIR: &str = "dinner-decider";

/// Everything a run needs, built once and passed to the runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Model tag on the completion endpoint
    pub model: String,

    /// Base URL of the completion endpoint
    pub endpoint: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Cap on generated tokens per stage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<usize>,

    /// Request timeout; unset waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Whole-chain attempts before accepting invalid output
    pub max_attempts: usize,

    /// Number of recent meals remembered
    pub history_capacity: usize,

    /// Location of the meal history file
    pub history_path: PathBuf,

    /// Stage personas and templates
    pub stages: StageSet,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            history_capacity: DEFAULT_CAPACITY,
            history_path: default_history_path(),
            stages: StageSet::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        Ok(config)
    }

    /// Load from an explicit path, or from the default location if it exists.
    ///
    /// Environment overrides are applied and the result is validated.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        std::fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup; blank values are ignored
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(model) = get(ENV_MODEL) {
            self.model = model;
        }
        if let Some(endpoint) = get(ENV_ENDPOINT) {
            self.endpoint = endpoint;
        }
        if let Some(path) = get(ENV_HISTORY) {
            self.history_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            bail!("model must not be empty");
        }
        if self.endpoint.trim().is_empty() {
            bail!("endpoint must not be empty");
        }
        if self.max_attempts == 0 {
            bail!("max_attempts must be at least 1");
        }
        if self.history_capacity == 0 {
            bail!("history_capacity must be at least 1");
        }
        Ok(())
    }

    pub fn ollama_config(&self) -> OllamaConfig {
        OllamaConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout_secs: self.timeout_secs,
        }
    }

    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions {
            temperature: Some(self.temperature),
            max_tokens: self.max_tokens,
            ..CompletionOptions::default()
        }
    }
}

/// `<config dir>/dinner-decider/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// `<local data dir>/dinner-decider/meal_history.txt`, else `.dinner-decider/` in the working directory
pub fn default_history_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
        .join("meal_history.txt")
}
