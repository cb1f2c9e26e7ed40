//! Application configuration management.
//!
//! Configuration is stored at `~/.config/little-lemon/config.json`. Every
//! field is optional; unset fields fall back to built-in defaults, and a
//! couple of environment variables override the file.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::api::client::{DEFAULT_MENU_URL, DEFAULT_TIMEOUT_SECS};
use crate::search::DEFAULT_DEBOUNCE;
use crate::utils::DEFAULT_IMAGE_BASE_URL;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "little-lemon";

/// Config file name
const CONFIG_FILE: &str = "config.json";

const DATABASE_FILE: &str = "menu.db";
const PROFILE_FILE: &str = "profile.json";

/// Overrides `menu_url`
pub const ENV_MENU_URL: &str = "LITTLE_LEMON_MENU_URL";
/// Overrides `database_path`
pub const ENV_DATABASE: &str = "LITTLE_LEMON_DB";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub menu_url: Option<String>,
    pub image_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub database_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(ENV_MENU_URL) {
            if !url.trim().is_empty() {
                self.menu_url = Some(url);
            }
        }
        if let Ok(path) = std::env::var(ENV_DATABASE) {
            if !path.trim().is_empty() {
                self.database_path = Some(PathBuf::from(path));
            }
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn database_path(&self) -> Result<PathBuf> {
        match self.database_path {
            Some(ref path) => Ok(path.clone()),
            None => Ok(self.cache_dir()?.join(DATABASE_FILE)),
        }
    }

    pub fn profile_path(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME).join(PROFILE_FILE))
    }

    pub fn menu_url(&self) -> &str {
        self.menu_url.as_deref().unwrap_or(DEFAULT_MENU_URL)
    }

    pub fn image_base_url(&self) -> &str {
        self.image_base_url.as_deref().unwrap_or(DEFAULT_IMAGE_BASE_URL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_DEBOUNCE)
    }
}
