//! Configuration management for layered-styles

pub mod schema;

pub use schema::{
    is_valid_layer_name, layered_handle, Config, GeneralConfig, LayerConfig, SiteConfig, StylesheetEntry,
    DEFAULT_LAYER_NAME,
};

use crate::error::{LayeredError, LayeredResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("layered-styles")
            .join("config.toml")
    }

    /// Get the state directory path, honouring `general.state_dir`
    pub fn state_dir(config: &Config) -> PathBuf {
        if let Some(dir) = &config.general.state_dir {
            return dir.clone();
        }
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("layered-styles")
    }

    /// Get the registered style snapshot path
    pub fn snapshot_path(config: &Config) -> PathBuf {
        Self::state_dir(config).join("registered-styles.json")
    }

    /// Get the audit log path
    pub fn audit_log_path(config: &Config) -> PathBuf {
        Self::state_dir(config).join("audit.log")
    }

    /// Load configuration, falling back to defaults if not exists
    pub async fn load(&self) -> LayeredResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> LayeredResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| LayeredError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| LayeredError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> LayeredResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            LayeredError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> LayeredResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| LayeredError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.layer.name, DEFAULT_LAYER_NAME);
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.layer.name = "vendor".to_string();
        config
            .stylesheets
            .push(StylesheetEntry::new("demo", "/site/demo.css"));

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded, config);
    }

    #[tokio::test]
    async fn invalid_toml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "stylesheets = 3").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().await.unwrap_err();
        assert!(matches!(err, LayeredError::ConfigInvalid { path: p, .. } if p == path));
    }

    #[test]
    fn state_dir_override() {
        let mut config = Config::default();
        config.general.state_dir = Some(PathBuf::from("/var/lib/ls"));

        assert_eq!(
            ConfigManager::snapshot_path(&config),
            PathBuf::from("/var/lib/ls/registered-styles.json")
        );
        assert_eq!(
            ConfigManager::audit_log_path(&config),
            PathBuf::from("/var/lib/ls/audit.log")
        );
    }
}
