//! Configuration loading.
//!
//! The bot reads a single JSON file (default `configs.json`, overridable
//! via `GRASS_CONFIG_PATH`) plus a newline-delimited proxy list when
//! proxying is enabled.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use steadysockets::Route;
use thiserror::Error;

/// Default config file path, next to the binary's working directory
pub const DEFAULT_CONFIG_PATH: &str = "configs.json";

/// Environment variable overriding the config file path
pub const CONFIG_PATH_ENV_VAR: &str = "GRASS_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Main bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    pub websocket: WebsocketConfig,
    pub settings: SettingsConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebsocketConfig {
    /// Remote endpoint (wss://...)
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// Account identifier sent in the AUTH reply
    pub user_id: String,
    #[serde(default)]
    pub use_proxy: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NetworkConfig {
    /// Path to a newline-delimited list of proxy URLs
    #[serde(default)]
    pub proxy_list: Option<String>,
}

impl BotConfig {
    /// Load and validate the configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: BotConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.websocket.url.is_empty() {
            return Err(ConfigError::ValidationError(
                "websocket.url must not be empty".to_string(),
            ));
        }
        if self.settings.use_proxy && self.network.proxy_list.is_none() {
            return Err(ConfigError::ValidationError(
                "settings.use_proxy is set but network.proxy_list is missing".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the set of routes this process will keep alive
    ///
    /// One proxied route per proxy-list entry when proxying is enabled;
    /// a single direct route when it is disabled or the list is empty.
    pub fn resolved_routes(&self) -> Result<Vec<Route>> {
        if self.settings.use_proxy {
            if let Some(path) = &self.network.proxy_list {
                let proxies = load_proxy_list(path)?;
                if !proxies.is_empty() {
                    return proxies
                        .iter()
                        .map(|proxy| {
                            Route::proxied(proxy)
                                .map_err(|e| ConfigError::ValidationError(e.to_string()))
                        })
                        .collect();
                }
            }
        }
        Ok(vec![Route::direct()])
    }
}

/// Load a newline-delimited proxy list, skipping blank lines
pub fn load_proxy_list(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Config file path from the environment, or the default
pub fn config_path_from_env() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV_VAR)
        .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
        .into()
}
