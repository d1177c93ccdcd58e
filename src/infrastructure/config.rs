// src/infrastructure/config.rs
use crate::constants::{
    API_URL_ENV_VAR, DEFAULT_API_URL, REQUEST_TIMEOUT_SECS, SEARCH_DEBOUNCE_MS, STALE_TIME_SECS,
    TOKEN_ENV_VAR,
};
use crate::domain::DomainError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Optional TOML settings file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_stale_time_secs")]
    pub stale_time_secs: u64,
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
}

// Default value functions
fn default_api_url() -> String { DEFAULT_API_URL.to_string() }
fn default_request_timeout_secs() -> u64 { REQUEST_TIMEOUT_SECS }
fn default_stale_time_secs() -> u64 { STALE_TIME_SECS }
fn default_search_debounce_ms() -> u64 { SEARCH_DEBOUNCE_MS }

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            stale_time_secs: default_stale_time_secs(),
            search_debounce_ms: default_search_debounce_ms(),
        }
    }
}

impl FileConfig {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: FileConfig = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("notehub").join("config.toml"))
}

/// Resolved runtime settings
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub token: String,
    pub request_timeout: Duration,
    pub stale_time: Duration,
    pub search_debounce: Duration,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .field("stale_time", &self.stale_time)
            .field("search_debounce", &self.search_debounce)
            .finish()
    }
}

impl AppConfig {
    /// Combine file settings with values taken from the environment.
    ///
    /// A missing or blank token is a configuration error; nothing may talk to
    /// the service without one.
    pub fn from_parts(
        file: FileConfig,
        token: Option<String>,
        api_url_override: Option<String>,
    ) -> Result<Self, DomainError> {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                DomainError::Configuration(format!(
                    "{TOKEN_ENV_VAR} is missing. Add it to your environment variables."
                ))
            })?;

        let api_url = api_url_override
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(file.api_url);

        Ok(Self {
            api_url,
            token,
            request_timeout: Duration::from_secs(file.request_timeout_secs),
            stale_time: Duration::from_secs(file.stale_time_secs),
            search_debounce: Duration::from_millis(file.search_debounce_ms),
        })
    }

    /// Resolve settings for this process.
    ///
    /// An explicit `config_path` must exist; the default location is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => {
                    debug!(?path, "Loading default config file");
                    FileConfig::load(&path)?
                }
                _ => FileConfig::default(),
            },
        };

        let config = Self::from_parts(
            file,
            std::env::var(TOKEN_ENV_VAR).ok(),
            std::env::var(API_URL_ENV_VAR).ok(),
        )?;
        debug!(?config, "Resolved configuration");
        Ok(config)
    }
}
