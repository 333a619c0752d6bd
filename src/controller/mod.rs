//! Device logic controller module
//!
//! This module owns the device state and implements the menu state machine that
//! the single button and the adjustment control drive.
//!
//! # Overview
//!
//! The device controller is the central coordinator that:
//! - **Receives events** (button presses, adjustments, text lines, ticks) in arrival order
//! - **Runs the menu state machine** and the config screen inactivity timeout
//! - **Takes measurements**, locally through the simulation or by asking the device
//! - **Sends notifications** with a state snapshot to the renderer
//!
//! # Architecture
//!
//! - `DeviceController`: owner of settings, screen, latest measurement and grid
//! - `DeviceEvent`: the five inputs the controller understands
//! - `Notification` / `DisplayState`: what the renderer receives
//! - **Serialized**: one event at a time, from one event queue
//!
//! # Event Flow
//!
//! ```text
//! button / LineReader / Tick → DeviceEvent → DeviceController → SimulationModel | Command
//!                                                  ↓
//!                                           Notification → renderer
//! device output → LineReceived → ResponseUpdate → DeviceController
//! ```
//!
//! # Screens
//!
//! | Screen | Long press | Short press | Adjust |
//! |---|---|---|---|
//! | Main | open menu | measure | ignored |
//! | Menu | back to main | open selected entry | move selection |
//! | Config* | back to main | back to main | change value, send `config ...` |
//!
//! Config screens return to the main screen after 5 s without input and raise an
//! inactivity timeout notification.

pub mod device_controller;
pub mod state;

pub use device_controller::{
    CALIBRATION_STEP_FACTOR, DeviceController, step_calibration, step_iso, step_metering_mode,
};
pub use state::{AdjustDirection, DeviceEvent, DisplayState, MenuItem, Notification, ScreenState};
