//! Configuration manager for loading and saving application configuration
//!
//! This module provides functionality to load and save configuration to
//! `$LIGHTMETER_HOME/lightmeter/config.json` with atomic writes to prevent corruption.

use crate::config::models::AppConfig;
use crate::error::{LightmeterError, Result, StringError};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the directory that holds the `lightmeter` folder
pub const HOME_ENV_VAR: &str = "LIGHTMETER_HOME";

/// Configuration manager
pub struct ConfigManager;

impl ConfigManager {
    /// Get the path to the configuration file
    ///
    /// Returns: `$LIGHTMETER_HOME/lightmeter/config.json`, relative to the working
    /// directory when the variable is unset
    pub fn get_config_path() -> PathBuf {
        Self::get_data_dir().join("config.json")
    }

    /// Directory holding the configuration file and logs
    pub fn get_data_dir() -> PathBuf {
        let home = std::env::var(HOME_ENV_VAR).unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join("lightmeter")
    }

    /// Load configuration from the default location
    ///
    /// If the configuration file doesn't exist or is corrupt, returns default configuration.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(&Self::get_config_path())
    }

    /// Load configuration from `path`
    ///
    /// Missing files, unparsable JSON and settings that violate the device
    /// invariants all fall back to the defaults.
    pub fn load_from(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            info!("Configuration file not found, using defaults");
            return Ok(AppConfig::default());
        }

        let json = std::fs::read_to_string(path)?;

        match serde_json::from_str::<AppConfig>(&json) {
            Ok(config) => match config.device.validate() {
                Ok(()) => {
                    info!("Configuration loaded successfully");
                    Ok(config)
                }
                Err(e) => {
                    warn!("Stored device settings rejected, using defaults: {}", e);
                    Ok(AppConfig::default())
                }
            },
            Err(e) => {
                warn!("Failed to parse configuration, using defaults: {}", e);
                Ok(AppConfig::default())
            }
        }
    }

    /// Save configuration to the default location
    pub fn save(config: &AppConfig) -> Result<()> {
        Self::save_to(&Self::get_config_path(), config)
    }

    /// Save configuration to `path` with an atomic write
    ///
    /// The JSON is written to a temporary file in the same directory which then
    /// replaces the target in one step.
    pub fn save_to(path: &Path, config: &AppConfig) -> Result<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| LightmeterError::ConfigError(StringError::new("Invalid config path")))?;
        std::fs::create_dir_all(config_dir)?;

        let json = serde_json::to_string_pretty(config)?;
        let mut temp_file = tempfile::NamedTempFile::new_in(config_dir)?;
        temp_file.write_all(json.as_bytes())?;
        temp_file.as_file().sync_all()?;
        temp_file
            .persist(path)
            .map_err(|e| LightmeterError::ConfigError(Box::new(e)))?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::MeteringMode;
    use crate::test_utils::{HomeGuard, create_test_dir};

    #[test]
    fn test_config_path() {
        let temp_dir = create_test_dir();
        let _guard = HomeGuard::new(&temp_dir);

        let path = ConfigManager::get_config_path();
        assert!(path.starts_with(temp_dir.path()));
        assert!(path.to_string_lossy().contains("lightmeter"));
        assert!(path.to_string_lossy().ends_with("config.json"));
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = create_test_dir();
        let config = ConfigManager::load_from(&temp_dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_through_env() {
        let temp_dir = create_test_dir();
        let _guard = HomeGuard::new(&temp_dir);

        let mut config = AppConfig::default();
        config.device.iso = 800;
        config.device.metering_mode = MeteringMode::Highlight;
        config.device.calibration = 140.5;
        ConfigManager::save(&config).unwrap();

        assert!(temp_dir.path().join("lightmeter").join("config.json").exists());
        assert_eq!(ConfigManager::load().unwrap(), config);
    }

    #[test]
    fn test_corrupt_config_uses_defaults() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(ConfigManager::load_from(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_invalid_settings_use_defaults() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"device":{"iso":123,"metering_mode":"spot","calibration":128.0}}"#,
        )
        .unwrap();
        assert_eq!(ConfigManager::load_from(&path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let temp_dir = create_test_dir();
        let path = temp_dir.path().join("nested").join("config.json");
        ConfigManager::save_to(&path, &AppConfig::default()).unwrap();
        ConfigManager::save_to(&path, &AppConfig::default()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
    }
}
