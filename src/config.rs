//! `config.toml` loading for the wake word engine

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::wake::{DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_DISTANCE, DEFAULT_PHRASE, EngineSettings};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub wake: WakeConfig,
}

// ============================================================================
// Wake Config
// ============================================================================

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct WakeConfig {
    /// Activation phrase, matched case-insensitively
    #[serde(default = "default_phrase")]
    pub phrase: String,
    /// Maximum character edit distance for a window to count
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
    /// Minimum gap between two detections
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Ignore punctuation and digits in transcripts
    #[serde(default)]
    pub strip_punctuation: bool,
}

impl Default for WakeConfig {
    fn default() -> Self {
        Self {
            phrase: default_phrase(),
            max_distance: default_max_distance(),
            debounce_ms: default_debounce_ms(),
            strip_punctuation: false,
        }
    }
}

impl From<&WakeConfig> for EngineSettings {
    fn from(wake: &WakeConfig) -> Self {
        Self {
            phrase: wake.phrase.clone(),
            max_distance: wake.max_distance,
            debounce_ms: wake.debounce_ms,
            strip_punctuation: wake.strip_punctuation,
        }
    }
}

fn default_phrase() -> String {
    DEFAULT_PHRASE.into()
}
fn default_max_distance() -> usize {
    DEFAULT_MAX_DISTANCE
}
fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl Config {
    /// Load `config.toml` from the working directory, falling back to defaults
    pub fn load() -> Self {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if !path.exists() {
            return Config::default();
        }
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring {}", DEFAULT_CONFIG_PATH);
            Config::default()
        })
    }

    /// Load an explicitly named config file
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}
