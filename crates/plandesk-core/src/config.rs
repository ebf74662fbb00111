//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, where tokens are stored, and the last email used to log
//! in.
//!
//! Configuration is stored at `~/.config/plandesk/config.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::DEFAULT_API_BASE_URL;
use crate::auth::{FileTokenStore, KeyringTokenStore, TokenStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "plandesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the configured API base URL
pub const API_URL_ENV: &str = "PLANDESK_API_URL";

/// Where the token pair is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenBackend {
    /// `tokens.json` in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub token_backend: TokenBackend,
    #[serde(default)]
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).context("Failed to read config file")?;
            serde_json::from_str(&contents).context("Failed to parse config file")
        } else {
            debug!(?path, "No config file, using defaults");
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// `~/.cache/plandesk`: token file and log file
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// API base URL: environment override, then config, then the default
    pub fn api_base_url(&self) -> String {
        self.resolve_base_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_base_url(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.api_base_url.clone().filter(|s| !s.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Build the configured token storage backend
    pub fn token_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match self.token_backend {
            TokenBackend::File => Arc::new(FileTokenStore::new(Self::cache_dir()?)),
            TokenBackend::Keyring => Arc::new(KeyringTokenStore::new()),
        };
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join(CONFIG_FILE)).expect("load");
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.token_backend, TokenBackend::File);
        assert_eq!(config.last_email, None);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(APP_NAME).join(CONFIG_FILE);
        let config = Config {
            api_base_url: Some("https://plans.example.com/api/v1".to_string()),
            token_backend: TokenBackend::Keyring,
            last_email: Some("a@b.com".to_string()),
        };
        config.save_to(&path).expect("save");

        let contents = std::fs::read_to_string(&path).expect("read");
        assert!(contents.contains(r#""token_backend": "keyring""#));

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.api_base_url, config.api_base_url);
        assert_eq!(loaded.token_backend, TokenBackend::Keyring);
        assert_eq!(loaded.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{"last_email": "a@b.com"}"#).expect("write");

        let config = Config::load_from(&path).expect("load");
        assert_eq!(config.token_backend, TokenBackend::File);
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_base_url_precedence() {
        let mut config = Config::default();
        assert_eq!(config.resolve_base_url(None), DEFAULT_API_BASE_URL);

        config.api_base_url = Some("https://configured.example.com".to_string());
        assert_eq!(config.resolve_base_url(None), "https://configured.example.com");
        assert_eq!(
            config.resolve_base_url(Some("https://env.example.com".to_string())),
            "https://env.example.com"
        );
        // Blank override is ignored
        assert_eq!(
            config.resolve_base_url(Some("  ".to_string())),
            "https://configured.example.com"
        );
    }
}
