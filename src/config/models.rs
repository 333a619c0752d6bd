//! Configuration data models
//!
//! This module defines the data structures used for application configuration.

use crate::error::{LightmeterError, Result};
use crate::exposure::{ISO_LADDER, MeteringMode, is_valid_iso};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// ISO speed selected after power-on or `reset`
pub const DEFAULT_ISO: u32 = 100;
/// Shutter speed calibration factor after power-on or `reset`
pub const DEFAULT_CALIBRATION: f64 = 128.0;

/// Photographic settings of the device
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceSettings {
    /// ISO speed, always one of [`ISO_LADDER`]
    pub iso: u32,
    /// Metering mode
    pub metering_mode: MeteringMode,
    /// Shutter speed calibration factor, always positive
    pub calibration: f64,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            iso: DEFAULT_ISO,
            metering_mode: MeteringMode::default(),
            calibration: DEFAULT_CALIBRATION,
        }
    }
}

impl DeviceSettings {
    /// Check the ISO ladder and calibration invariants
    pub fn validate(&self) -> Result<()> {
        if !is_valid_iso(self.iso) {
            return Err(LightmeterError::InvalidArgument(format!(
                "ISO {} is not one of {ISO_LADDER:?}",
                self.iso
            )));
        }
        if !self.calibration.is_finite() || self.calibration <= 0.0 {
            return Err(LightmeterError::InvalidArgument(format!(
                "calibration {} must be positive",
                self.calibration
            )));
        }
        Ok(())
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Settings restored into the controller at startup
    pub device: DeviceSettings,
    /// User preferences
    #[serde(default)]
    pub preferences: UserPreferences,
}

/// User preferences and settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    /// Inactivity timeout of the config screens in milliseconds
    pub config_timeout_ms: u64,
    /// Presses held longer than this (milliseconds) are long presses
    pub long_press_threshold_ms: u64,
    /// Measure with the simulation model when no device is attached
    pub simulation_fallback: bool,
    /// Fixed seed for the simulation model (random when unset)
    pub simulation_seed: Option<u64>,
    /// Event loop tick interval in milliseconds
    pub tick_interval_ms: u64,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            config_timeout_ms: 5000,
            long_press_threshold_ms: 1000,
            simulation_fallback: true,
            simulation_seed: None,
            tick_interval_ms: 100,
        }
    }
}

impl UserPreferences {
    /// Config screen inactivity timeout
    pub fn config_timeout(&self) -> Duration {
        Duration::from_millis(self.config_timeout_ms)
    }

    /// Long press classification boundary
    pub fn long_press_threshold(&self) -> Duration {
        Duration::from_millis(self.long_press_threshold_ms)
    }

    /// Event loop tick interval, never zero
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
