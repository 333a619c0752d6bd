//! `lightmeter` - control logic for a 4x5 camera lightmeter
//!
//! Turns a 5×4 grid of light sensor readings into an exposure value and shutter
//! speed, drives the single-button menu of the device, and speaks the text line
//! protocol of the metering firmware. When no device is attached, a simulation
//! model stands in for the sensors.
//!
//! # Architecture
//!
//! - `exposure`: the exposure calculator (pure functions)
//! - `simulation`: synthetic sensor readouts
//! - `protocol`: command encoding/parsing, response decoding, line framing
//! - `controller`: the `DeviceController` state machine and its event loop
//! - `config`, `input`, `utils`: persistence, line input and logging

// Module declarations
pub mod config;
pub mod controller;
pub mod error;
pub mod exposure;
pub mod input;
pub mod protocol;
pub mod simulation;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use error::{LightmeterError, Result};
