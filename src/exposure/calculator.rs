//! Exposure calculator
//!
//! Pure functions turning a sensor grid and the photographic parameters into an
//! exposure value and a recommended shutter speed.

use crate::error::{LightmeterError, Result};
use crate::exposure::grid::{GRID_COLS, GRID_ROWS, SensorGrid};
use crate::exposure::mode::MeteringMode;
use serde::{Deserialize, Serialize};

/// Lowest exposure value reported
pub const EV_MIN: f64 = -6.0;
/// Highest exposure value reported
pub const EV_MAX: f64 = 20.0;
/// Illuminance (lux) corresponding to EV 0 at ISO 100
pub const LUX_AT_EV_ZERO: f64 = 2.5;
/// Share of the center cells in center-weighted metering
pub const CENTER_WEIGHT: f64 = 0.6;

/// Result of one measurement
///
/// Replaced as a whole whenever a new measurement (local or reported by the
/// device) arrives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Exposure value, rounded to one decimal
    pub ev: f64,
    /// Shutter speed text, `1/<n>` or `<t> seconds`
    pub shutter_speed: String,
    /// ISO speed the shutter speed was computed for
    pub iso: u32,
    /// Metering mode used for the light estimate
    pub metering_mode: MeteringMode,
}

impl MeasurementResult {
    /// EV formatted with one decimal, as shown on the display and the wire
    pub fn ev_text(&self) -> String {
        format!("{:.1}", self.ev)
    }

    /// The two summary lines the firmware prints after a measurement
    pub fn response_lines(&self) -> [String; 2] {
        [
            format!(
                "ISO {}, {} (EV: {})",
                self.iso,
                self.shutter_speed,
                self.ev_text()
            ),
            format!("Metering mode: {}", self.metering_mode),
        ]
    }
}

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Light estimate for the given metering mode
pub fn average_lux(grid: &SensorGrid, mode: MeteringMode) -> f64 {
    let [center_a, center_b] = grid.center_values();
    let center_mean = (center_a + center_b) / 2.0;

    match mode {
        MeteringMode::Center => {
            let peripheral_count = (GRID_ROWS * GRID_COLS - 2) as f64;
            let peripheral_mean = (grid.total() - center_a - center_b) / peripheral_count;
            center_mean * CENTER_WEIGHT + peripheral_mean * (1.0 - CENTER_WEIGHT)
        }
        MeteringMode::Matrix => grid.total() / (GRID_ROWS * GRID_COLS) as f64,
        MeteringMode::Spot => center_mean,
        MeteringMode::Highlight => grid.max(),
    }
}

/// `EV = clamp(round(log2(lux / 2.5), 1), -6, 20)`
///
/// Zero lux maps to `EV_MIN`.
pub fn lux_to_ev(lux: f64) -> f64 {
    round_to_tenth((lux / LUX_AT_EV_ZERO).log2()).clamp(EV_MIN, EV_MAX)
}

/// Exposure time in seconds: `2^-EV * (100 / iso) * calibration`
pub fn exposure_time(ev: f64, iso: u32, calibration: f64) -> f64 {
    2f64.powf(-ev) * (100.0 / f64::from(iso)) * calibration
}

/// Format an exposure time the way the device displays it
///
/// Times below one second become a reciprocal (`1/125`), longer ones are shown
/// with one decimal (`2.6 seconds`).
pub fn format_shutter_speed(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("1/{}", (1.0 / seconds).round())
    } else {
        format!("{seconds:.1} seconds")
    }
}

/// Compute EV and shutter speed for a grid
///
/// Deterministic: identical inputs always produce an identical result.
pub fn compute(
    grid: &SensorGrid,
    mode: MeteringMode,
    iso: u32,
    calibration: f64,
) -> Result<MeasurementResult> {
    if iso == 0 {
        return Err(LightmeterError::InvalidIso(0));
    }
    if !calibration.is_finite() || calibration <= 0.0 {
        return Err(LightmeterError::InvalidArgument(format!(
            "calibration {calibration} must be a positive number"
        )));
    }

    let lux = average_lux(grid, mode);
    let ev = lux_to_ev(lux);
    let seconds = exposure_time(ev, iso, calibration);

    Ok(MeasurementResult {
        ev,
        shutter_speed: format_shutter_speed(seconds),
        iso,
        metering_mode: mode,
    })
}
