//! Logging system initialization
//!
//! Sets up tracing-based logging with file output to `<log_dir>/lightmeter.log`
//! and automatic rotation on startup keeping 9 historical files.

use crate::error::{LightmeterError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Base name of the log file
pub const LOG_FILE_NAME: &str = "lightmeter.log";

/// Maximum number of historical log files to keep (lightmeter.log.1 through lightmeter.log.9)
const MAX_LOG_FILES: u8 = 9;

/// Initialize the logging system
///
/// Log level defaults to INFO but can be configured via `RUST_LOG` environment variable.
/// Rotates existing logs on startup so each session gets a fresh file.
pub fn init_logging(log_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(log_dir)?;

    rotate_logs_on_startup(&log_dir.join(LOG_FILE_NAME))?;

    // Rotation is handled above, once per session
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("lightmeter")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| LightmeterError::ConfigError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| LightmeterError::ConfigError(Box::new(e)))?;

    tracing::info!("lightmeter v{} started", env!("CARGO_PKG_VERSION"));

    Ok(())
}

/// Rotate log files on startup
///
/// - lightmeter.log.9 is deleted (oldest log)
/// - lightmeter.log.N -> lightmeter.log.N+1 for N = 8 down to 1
/// - lightmeter.log -> lightmeter.log.1
///
/// A fresh lightmeter.log is created by the appender afterwards.
fn rotate_logs_on_startup(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path
        .parent()
        .ok_or_else(|| LightmeterError::ConfigError(StringError::new("Invalid log path")))?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| LightmeterError::ConfigError(StringError::new("Invalid log filename")))?
        .to_string_lossy();

    let oldest_log = log_dir.join(format!("{log_name}.{MAX_LOG_FILES}"));
    if oldest_log.exists() {
        std::fs::remove_file(&oldest_log)?;
    }

    for i in (1..MAX_LOG_FILES).rev() {
        let current_log = log_dir.join(format!("{log_name}.{i}"));
        if current_log.exists() {
            std::fs::rename(&current_log, log_dir.join(format!("{log_name}.{}", i + 1)))?;
        }
    }

    std::fs::rename(log_path, log_dir.join(format!("{log_name}.1")))?;

    Ok(())
}
