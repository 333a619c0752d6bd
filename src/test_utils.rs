//! Shared test utilities for lightmeter unit tests.
//!
//! This module provides common test infrastructure used across multiple test modules.
//! It is only compiled during testing (`#[cfg(test)]`).

use crate::config::HOME_ENV_VAR;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize tests that modify the `LIGHTMETER_HOME` environment variable.
static HOME_LOCK: Mutex<()> = Mutex::new(());

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// RAII guard that points `LIGHTMETER_HOME` at a temporary directory for a test
/// scope and restores the original value when dropped.
///
/// # Safety Considerations
///
/// `std::env::set_var` and `std::env::remove_var` are unsafe because other threads
/// may read the environment concurrently. The guard holds `HOME_LOCK` for its whole
/// lifetime, so tests touching the variable run one at a time, and the original
/// value is restored on drop even when the test panics.
pub struct HomeGuard {
    original: Option<String>,
    // Held for the lifetime of the guard
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[expect(
    unsafe_code,
    reason = "Test-only code that modifies environment variables under a global lock"
)]
impl HomeGuard {
    /// Create a new guard that sets `LIGHTMETER_HOME` to the given temp directory path.
    pub fn new(temp_dir: &TempDir) -> Self {
        // A panicking test poisons the lock; the environment is restored by then
        let lock = HOME_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let original = std::env::var(HOME_ENV_VAR).ok();
        // SAFETY: HOME_LOCK serializes every writer of this variable
        unsafe {
            std::env::set_var(HOME_ENV_VAR, temp_dir.path());
        }
        Self {
            original,
            _lock: lock,
        }
    }
}

#[expect(
    unsafe_code,
    reason = "Test-only code that restores environment variables under a global lock"
)]
impl Drop for HomeGuard {
    fn drop(&mut self) {
        // SAFETY: the lock is still held until this guard's fields are dropped
        if let Some(ref original) = self.original {
            unsafe {
                std::env::set_var(HOME_ENV_VAR, original);
            }
        } else {
            unsafe {
                std::env::remove_var(HOME_ENV_VAR);
            }
        }
    }
}
