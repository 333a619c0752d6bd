//! Configuration management module
//!
//! This module handles loading, saving, and managing application configuration.
//! Configuration is stored in `$LIGHTMETER_HOME/lightmeter/config.json` with atomic
//! writes to prevent corruption.

pub mod manager;
pub mod models;

pub use manager::{ConfigManager, HOME_ENV_VAR};
pub use models::{AppConfig, DEFAULT_CALIBRATION, DEFAULT_ISO, DeviceSettings, UserPreferences};
