//! Console configuration, read from `~/.meditel/config.yaml`

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{API_BASE_ENV, DEFAULT_API_BASE, DEFAULT_LOG_FILE, DEFAULT_TIMEOUT_SECS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the backend, without trailing slash
    pub api_base: String,
    pub request_timeout_secs: u64,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: String::from(DEFAULT_API_BASE),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Location of the config file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".meditel")
            .join("config.yaml")
    }

    /// Load from the default path, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(&Self::default_path())?;
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            config.api_base = base;
        }
        Ok(config.normalized())
    }

    /// Read a config file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        let trimmed = self.api_base.trim().trim_end_matches('/');
        self.api_base = if trimmed.is_empty() {
            String::from(DEFAULT_API_BASE)
        } else {
            trimmed.to_string()
        };
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = DEFAULT_TIMEOUT_SECS;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Config pointing at the given base URL, other fields default
    pub fn with_api_base(base: impl Into<String>) -> Self {
        Config {
            api_base: base.into(),
            ..Config::default()
        }
        .normalized()
    }
}
