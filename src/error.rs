//! Error types for the lightmeter core
//!
//! This module defines all error types used throughout the crate,
//! providing clear error messages and proper error propagation.
//!
//! Argument errors (`InvalidArgument`, `UnknownMeteringType`, `UnknownCommand`) are
//! reported to the renderer as user-visible messages and never change device state.
//! Protocol lines that match no pattern and events that are meaningless in the
//! current screen are not errors at all and never reach this type.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for the lightmeter core
#[derive(Debug, Error)]
pub enum LightmeterError {
    /// A numeric command argument could not be parsed or is out of its domain
    #[error("Invalid value: {0}")]
    InvalidArgument(String),

    /// A `config type` argument that matches none of the metering mode aliases
    #[error("Invalid metering type: {0}")]
    UnknownMeteringType(String),

    /// A command line whose verb is not part of the protocol
    #[error("Unknown command: '{0}'")]
    UnknownCommand(String),

    /// Sensor grid with the wrong shape or a negative/non-finite reading
    #[error("Invalid sensor grid: {0}")]
    InvalidSensorGrid(String),

    /// ISO speed that cannot be used for an exposure calculation
    #[error("Invalid ISO speed: {0}")]
    InvalidIso(i64),

    /// Measurement requested with no live transport and simulation disabled
    #[error("No measurement source: no device connected and simulation is disabled")]
    NoMeasurementSource,

    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl LightmeterError {
    /// Whether this error belongs to the user-facing argument class
    ///
    /// These are reported to the renderer and leave all state untouched.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::UnknownMeteringType(_) | Self::UnknownCommand(_)
        )
    }
}

/// Result type alias for lightmeter operations
pub type Result<T> = std::result::Result<T, LightmeterError>;

/// Convert an error to a user-friendly message
///
/// This function takes a `LightmeterError` and returns a message suitable
/// for the device console or a renderer status line.
pub fn get_user_friendly_error(error: &LightmeterError) -> String {
    match error {
        LightmeterError::InvalidArgument(detail) => format!("Error: invalid value ({detail})"),
        LightmeterError::UnknownMeteringType(name) => format!(
            "Error: invalid metering type '{name}'. \
             Use center, matrix, spot or highlight."
        ),
        LightmeterError::UnknownCommand(cmd) => {
            format!("Unknown command: '{cmd}'. Type 'help' for available commands.")
        }
        LightmeterError::InvalidSensorGrid(detail) => {
            format!("Sensor readout rejected: {detail}")
        }
        LightmeterError::InvalidIso(iso) => {
            format!("Error: ISO {iso} cannot be used for metering")
        }
        LightmeterError::NoMeasurementSource => "No device connected.\n\n\
             Connect a lightmeter or enable simulation to take measurements."
            .to_string(),
        LightmeterError::ConfigError(_) => "Failed to load or save configuration.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to the lightmeter directory."
            .to_string(),
        LightmeterError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        LightmeterError::JsonError(e) => {
            format!(
                "Configuration file is corrupted:\n\n{e}\n\n\
                 The application will use default settings."
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = LightmeterError::UnknownCommand("frobnicate".to_string());
        assert_eq!(error.to_string(), "Unknown command: 'frobnicate'");
    }

    #[test]
    fn test_user_friendly_messages() {
        let error = LightmeterError::InvalidArgument("'abc' is not an ISO speed".to_string());
        let message = get_user_friendly_error(&error);
        assert!(message.contains("invalid value"));
        assert!(message.contains("abc"));
    }

    #[test]
    fn test_unknown_command_user_friendly() {
        let error = LightmeterError::UnknownCommand("measure now".to_string());
        let message = get_user_friendly_error(&error);
        assert!(message.starts_with("Unknown command: 'measure now'"));
        assert!(message.contains("help"));
    }

    #[test]
    fn test_error_from_io() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: LightmeterError = io_error.into();
        assert!(matches!(error, LightmeterError::IoError(_)));
    }

    #[test]
    fn test_invalid_argument_class() {
        assert!(LightmeterError::InvalidArgument("x".into()).is_invalid_argument());
        assert!(LightmeterError::UnknownMeteringType("x".into()).is_invalid_argument());
        assert!(LightmeterError::UnknownCommand("x".into()).is_invalid_argument());
        assert!(!LightmeterError::NoMeasurementSource.is_invalid_argument());
        assert!(!LightmeterError::InvalidIso(0).is_invalid_argument());
    }

    #[test]
    fn test_config_error_preserves_source() {
        use std::error::Error as _;

        let error = LightmeterError::ConfigError(StringError::new("disk full"));
        assert_eq!(error.to_string(), "Configuration error: disk full");
        assert!(error.source().is_some());
    }
}
