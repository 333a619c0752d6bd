//! Exposure calculation module
//!
//! This module turns a grid of light sensor readings into an exposure value (EV)
//! and a recommended shutter speed.
//!
//! # Overview
//!
//! - `SensorGrid`: fixed 5×4 grid of non-negative lux readings
//! - `MeteringMode`: which cells contribute to the light estimate
//! - `compute`: the exposure calculator, a pure function
//! - `MeasurementResult`: EV, shutter text, ISO and mode of one measurement
//!
//! # Metering Modes
//!
//! | Mode | Light estimate |
//! |---|---|
//! | Center | 0.6 × mean(center cells) + 0.4 × mean(remaining 18 cells) |
//! | Matrix | mean of all 20 cells |
//! | Spot | mean of the 2 center cells (row 2, columns 1–2) |
//! | Highlight | maximum of all 20 cells |
//!
//! # Exposure
//!
//! ```text
//! EV = clamp(round(log2(lux / 2.5), 1), -6, 20)
//! t  = 2^-EV × (100 / ISO) × calibration
//! ```
//!
//! Times below one second are shown as `1/<n>`, longer ones as `<t> seconds`.
//!
//! # Example Usage
//!
//! ```
//! use lightmeter::exposure::{MeteringMode, SensorGrid, compute};
//!
//! let grid = SensorGrid::uniform(100.0)?;
//! let result = compute(&grid, MeteringMode::Matrix, 100, 128.0)?;
//! assert_eq!(result.ev_text(), "5.3");
//! assert_eq!(result.shutter_speed, "3.2 seconds");
//! # Ok::<(), lightmeter::error::LightmeterError>(())
//! ```

pub mod calculator;
pub mod grid;
pub mod mode;

pub use calculator::{
    EV_MAX, EV_MIN, MeasurementResult, average_lux, compute, exposure_time,
    format_shutter_speed, lux_to_ev, round_to_tenth,
};
pub use grid::{CENTER_COLS, CENTER_ROW, GRID_COLS, GRID_ROWS, SensorGrid};
pub use mode::MeteringMode;

/// ISO speeds selectable on the device, in menu order
pub const ISO_LADDER: [u32; 8] = [50, 100, 200, 400, 800, 1600, 3200, 6400];

/// Whether `iso` is one of the selectable ISO speeds
pub fn is_valid_iso(iso: u32) -> bool {
    ISO_LADDER.contains(&iso)
}
