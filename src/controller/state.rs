//! Events consumed and notifications produced by the device controller

use crate::config::DeviceSettings;
use crate::exposure::{MeasurementResult, SensorGrid};
use std::fmt;
use std::time::{Duration, Instant};

/// Direction of the adjustment control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustDirection {
    /// Next value (menu selection +1, higher ISO, next mode, calibration × 1.1)
    Up,
    /// Previous value (menu selection −1, lower ISO, previous mode, calibration ÷ 1.1)
    Down,
}

/// Input to the controller
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Button released before the long press threshold
    ShortPress,
    /// Button released after being held for the given time
    LongPress(Duration),
    /// Adjustment control moved
    Adjust(AdjustDirection),
    /// One line of text from the transport or the local shell
    LineReceived(String),
    /// Clock tick, drives the inactivity timeout
    Tick(Instant),
}

impl DeviceEvent {
    /// Classify a button release by how long the button was held
    ///
    /// Only presses held strictly longer than `threshold` are long presses.
    pub fn from_press(held: Duration, threshold: Duration) -> Self {
        if held > threshold {
            Self::LongPress(held)
        } else {
            Self::ShortPress
        }
    }
}

/// Entries of the settings menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    /// Open the ISO screen
    Iso,
    /// Open the metering type screen
    MeteringType,
    /// Open the calibration screen
    Calibration,
    /// Leave the menu
    Exit,
}

impl MenuItem {
    /// All entries in display order
    pub const ALL: [Self; 4] = [Self::Iso, Self::MeteringType, Self::Calibration, Self::Exit];

    /// Entry at `index`, if any
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label shown on the display
    pub fn label(self) -> &'static str {
        match self {
            Self::Iso => "ISO",
            Self::MeteringType => "Metering Type",
            Self::Calibration => "Calibration",
            Self::Exit => "Exit Menu",
        }
    }
}

/// Screen currently shown by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenState {
    /// Measurement screen
    #[default]
    Main,
    /// Settings menu with the highlighted entry (0..=3)
    Menu {
        /// Index into [`MenuItem::ALL`]
        selected_index: usize,
    },
    /// ISO adjustment screen
    ConfigIso,
    /// Metering type adjustment screen
    ConfigType,
    /// Calibration adjustment screen
    ConfigCalibration,
}

impl ScreenState {
    /// Whether this is one of the config screens, which time out
    pub fn is_config(self) -> bool {
        matches!(
            self,
            Self::ConfigIso | Self::ConfigType | Self::ConfigCalibration
        )
    }
}

impl fmt::Display for ScreenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Main => f.write_str("Main"),
            Self::Menu { selected_index } => {
                let label = MenuItem::from_index(*selected_index).map_or("?", MenuItem::label);
                write!(f, "Menu({label})")
            }
            Self::ConfigIso => f.write_str("ConfigIso"),
            Self::ConfigType => f.write_str("ConfigType"),
            Self::ConfigCalibration => f.write_str("ConfigCalibration"),
        }
    }
}

/// Snapshot of everything a renderer needs
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Active screen
    pub screen: ScreenState,
    /// Current ISO, metering mode and calibration
    pub settings: DeviceSettings,
    /// Latest measurement, if any
    pub measurement: Option<MeasurementResult>,
    /// Latest sensor readings for the matrix view
    pub grid: SensorGrid,
    /// Whether a live device transport is attached
    pub connected: bool,
}

/// Output of the controller towards the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// State changed after an event
    StateChanged(DisplayState),
    /// A config screen timed out and the device returned to the main screen
    InactivityTimeout(DisplayState),
    /// User-visible error message; state is unchanged
    Error(String),
    /// Console text (command acknowledgements, device output, measurement dumps)
    Console(String),
}
