use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};
use crate::sources::{DEFAULT_SOURCES, Sources};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "open5e.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_url")]
    pub url: String,
    /// `limit` sent with every list request.
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            page_limit: default_page_limit(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.open5e.com/v1".to_string()
}

fn default_page_limit() -> u32 {
    5000
}

fn default_timeout_ms() -> u64 {
    30_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Selection used when nothing has been persisted yet.
    #[serde(default = "default_sources")]
    pub default: Vec<String>,
    /// Location of the persisted selection. Defaults to the user data directory.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            default: default_sources(),
            store_path: None,
        }
    }
}

fn default_sources() -> Vec<String> {
    DEFAULT_SOURCES.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
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
    "warn".to_string()
}

impl ClientConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.api.url.trim().is_empty() {
            return Err("api.url must not be empty".into());
        }
        if let Err(e) = url::Url::parse(&self.api.url) {
            return Err(format!("api.url is not a valid URL: {e}"));
        }
        if self.api.page_limit == 0 {
            return Err("api.page_limit must be > 0".into());
        }
        if self.api.timeout_ms == 0 {
            return Err("api.timeout_ms must be > 0".into());
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    /// Loads the config file (explicit path, else `open5e.toml` if present)
    /// and applies `OPEN5E__*` environment overrides, e.g. `OPEN5E__API__URL`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ClientError::config(format!(
                        "config file not found: {}",
                        p.display()
                    )));
                }
                builder = builder.add_source(File::from(p.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        builder = builder.add_source(
            Environment::with_prefix("OPEN5E")
                .try_parsing(true)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("sources.default"),
        );
        let cfg = builder
            .build()
            .map_err(|e| ClientError::config(format!("config build error: {e}")))?;
        let merged: ClientConfig = cfg
            .try_deserialize()
            .map_err(|e| ClientError::config(format!("config deserialize error: {e}")))?;
        merged.validate().map_err(ClientError::Config)?;
        Ok(merged)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.api.timeout_ms)
    }

    pub fn default_sources(&self) -> Sources {
        Sources::new(self.sources.default.clone())
    }

    /// Where the source selection is persisted.
    pub fn store_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.sources.store_path {
            return Ok(path.clone());
        }
        let dir = dirs::data_dir()
            .ok_or_else(|| ClientError::config("cannot determine user data directory"))?;
        Ok(dir.join("open5e").join("store.json"))
    }
}
