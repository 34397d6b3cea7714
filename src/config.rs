use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting mjolnir.tile_dir")]
    MissingTileDir,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub mjolnir: MjolnirConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MjolnirConfig {
    /// Working directory the sequence file is written into
    pub tile_dir: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load from a `.toml` file, or JSON for any other extension
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config = if path.extension().map_or(false, |e| e == "toml") {
            toml::from_str(&content).context("Failed to parse config file")?
        } else {
            serde_json::from_str(&content).context("Failed to parse config file")?
        };
        Ok(config)
    }

    pub fn from_inline_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse inline config")
    }

    pub fn with_tile_dir<P: Into<PathBuf>>(mut self, tile_dir: P) -> Self {
        self.mjolnir.tile_dir = Some(tile_dir.into());
        self
    }

    pub fn tile_dir(&self) -> Result<&Path, ConfigError> {
        self.mjolnir
            .tile_dir
            .as_deref()
            .ok_or(ConfigError::MissingTileDir)
    }
}
