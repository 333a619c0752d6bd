//! Device controller implementation
//!
//! This module implements the menu state machine and the measurement flow. The
//! controller is the only owner of the settings, the active screen and the latest
//! measurement; every change goes through one of its event handlers.

use crate::config::{DeviceSettings, UserPreferences};
use crate::controller::state::{
    AdjustDirection, DeviceEvent, DisplayState, MenuItem, Notification, ScreenState,
};
use crate::error::{LightmeterError, Result, get_user_friendly_error};
use crate::exposure::{
    ISO_LADDER, MeasurementResult, MeteringMode, SensorGrid, compute, is_valid_iso,
    round_to_tenth,
};
use crate::protocol::{self, Command, HELP_TEXT, ResponseUpdate};
use crate::simulation::SimulationModel;
use parking_lot::Mutex;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Factor applied to the calibration per adjustment step
pub const CALIBRATION_STEP_FACTOR: f64 = 1.1;

/// Neighbouring ISO on the ladder, wrapping at both ends
pub fn step_iso(iso: u32, direction: AdjustDirection) -> u32 {
    let len = ISO_LADDER.len();
    let position = ISO_LADDER
        .iter()
        .position(|&value| value >= iso)
        .unwrap_or(len - 1);
    let next = match direction {
        AdjustDirection::Up => (position + 1) % len,
        AdjustDirection::Down => (position + len - 1) % len,
    };
    ISO_LADDER[next]
}

/// Neighbouring metering mode, wrapping at both ends
pub fn step_metering_mode(mode: MeteringMode, direction: AdjustDirection) -> MeteringMode {
    match direction {
        AdjustDirection::Up => mode.next(),
        AdjustDirection::Down => mode.previous(),
    }
}

/// Multiply or divide the calibration by 1.1, rounded to one decimal
///
/// A step that would round to zero keeps the current value.
pub fn step_calibration(calibration: f64, direction: AdjustDirection) -> f64 {
    let scaled = match direction {
        AdjustDirection::Up => calibration * CALIBRATION_STEP_FACTOR,
        AdjustDirection::Down => calibration / CALIBRATION_STEP_FACTOR,
    };
    let next = round_to_tenth(scaled);
    if next > 0.0 { next } else { calibration }
}

/// Device logic controller
pub struct DeviceController {
    /// ISO, metering mode and calibration
    settings: DeviceSettings,
    /// Active screen
    screen: ScreenState,
    /// Latest measurement, replaced as a whole
    measurement: Option<MeasurementResult>,
    /// Latest sensor readings
    grid: SensorGrid,
    /// Stand-in sensor used when no device is attached
    simulation: SimulationModel,
    /// Whether to measure with the simulation when no device is attached
    simulation_fallback: bool,
    /// Inactivity timeout of the config screens
    config_timeout: Duration,
    /// Presses held longer than this are long presses
    long_press_threshold: Duration,
    /// When the active config screen times out (armed only on config screens)
    config_deadline: Option<Instant>,
    /// Outbound line queue of the live device, if attached
    transport: Option<mpsc::SyncSender<String>>,
    /// Notification sender to the renderer
    notification_sender: mpsc::SyncSender<Notification>,
}

impl DeviceController {
    /// Create a controller on the main screen
    ///
    /// The simulation is seeded from `preferences.simulation_seed` when set.
    pub fn new(
        settings: DeviceSettings,
        preferences: &UserPreferences,
        notification_sender: mpsc::SyncSender<Notification>,
    ) -> Result<Self> {
        let simulation = match preferences.simulation_seed {
            Some(seed) => SimulationModel::from_seed(seed),
            None => SimulationModel::from_entropy(),
        };
        Self::with_simulation(settings, preferences, simulation, notification_sender)
    }

    /// Create a controller with an explicit simulation model
    pub fn with_simulation(
        settings: DeviceSettings,
        preferences: &UserPreferences,
        mut simulation: SimulationModel,
        notification_sender: mpsc::SyncSender<Notification>,
    ) -> Result<Self> {
        use tracing::info;

        settings.validate()?;
        let grid = simulation.randomize_idle();

        info!(
            "Device controller ready: ISO {}, {} metering, calibration {}",
            settings.iso, settings.metering_mode, settings.calibration
        );

        Ok(Self {
            settings,
            screen: ScreenState::Main,
            measurement: None,
            grid,
            simulation,
            simulation_fallback: preferences.simulation_fallback,
            config_timeout: preferences.config_timeout(),
            long_press_threshold: preferences.long_press_threshold(),
            config_deadline: None,
            transport: None,
            notification_sender,
        })
    }

    /// Current settings
    pub fn settings(&self) -> DeviceSettings {
        self.settings
    }

    /// Active screen
    pub fn screen(&self) -> ScreenState {
        self.screen
    }

    /// Latest measurement, if any
    pub fn measurement(&self) -> Option<&MeasurementResult> {
        self.measurement.as_ref()
    }

    /// Latest sensor readings
    pub fn grid(&self) -> &SensorGrid {
        &self.grid
    }

    /// When the active config screen will time out
    pub fn config_deadline(&self) -> Option<Instant> {
        self.config_deadline
    }

    /// Whether a live device transport is attached
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Snapshot for the renderer
    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            screen: self.screen,
            settings: self.settings,
            measurement: self.measurement.clone(),
            grid: self.grid.clone(),
            connected: self.is_connected(),
        }
    }

    /// Route outbound command lines to a live device
    ///
    /// While attached, received lines are decoded as device output and
    /// measurements are requested from the device.
    pub fn attach_transport(&mut self, sender: mpsc::SyncSender<String>) {
        use tracing::info;

        info!("Device transport attached");
        self.transport = Some(sender);
        self.send_state_update();
    }

    /// Fall back to local simulation
    pub fn detach_transport(&mut self) {
        use tracing::info;

        if self.transport.take().is_some() {
            info!("Device transport detached");
            self.send_state_update();
        }
    }

    /// Handle one event at the current time
    pub fn handle_event(&mut self, event: DeviceEvent) {
        self.handle_event_at(event, Instant::now());
    }

    /// Handle one event that happened at `now`
    ///
    /// `Tick` carries its own timestamp, which takes precedence. An expired
    /// config screen times out before the event itself is looked at.
    pub fn handle_event_at(&mut self, event: DeviceEvent, now: Instant) {
        use tracing::debug;

        let now = match event {
            DeviceEvent::Tick(at) => at,
            _ => now,
        };
        self.expire_config_screen(now);

        match event {
            DeviceEvent::ShortPress => self.on_short_press(now),
            DeviceEvent::LongPress(held) if held > self.long_press_threshold => {
                self.on_long_press(now);
            }
            DeviceEvent::LongPress(held) => {
                debug!(
                    "Press held for {:?} is within the long press threshold, treating as short press",
                    held
                );
                self.on_short_press(now);
            }
            DeviceEvent::Adjust(direction) => self.on_adjust(direction, now),
            DeviceEvent::LineReceived(line) => self.on_line(&line),
            DeviceEvent::Tick(_) => {}
        }
    }

    fn expire_config_screen(&mut self, now: Instant) {
        use tracing::info;

        let Some(deadline) = self.config_deadline else {
            return;
        };
        if now < deadline {
            return;
        }

        self.config_deadline = None;
        info!(
            "No input on {} for {:?}, returning to main screen",
            self.screen, self.config_timeout
        );
        self.screen = ScreenState::Main;
        self.notify(Notification::InactivityTimeout(self.display_state()));
    }

    /// Switch screens, arming the inactivity timeout on config screens
    fn set_screen(&mut self, screen: ScreenState, now: Instant) {
        use tracing::info;

        info!("Screen {} -> {}", self.screen, screen);
        self.screen = screen;
        self.config_deadline = screen.is_config().then(|| now + self.config_timeout);
        self.send_state_update();
    }

    fn on_long_press(&mut self, now: Instant) {
        match self.screen {
            ScreenState::Main => self.set_screen(ScreenState::Menu { selected_index: 0 }, now),
            _ => self.set_screen(ScreenState::Main, now),
        }
    }

    fn on_short_press(&mut self, now: Instant) {
        match self.screen {
            ScreenState::Main => self.trigger_measurement(),
            ScreenState::Menu { selected_index } => {
                let next = match MenuItem::from_index(selected_index) {
                    Some(MenuItem::Iso) => ScreenState::ConfigIso,
                    Some(MenuItem::MeteringType) => ScreenState::ConfigType,
                    Some(MenuItem::Calibration) => ScreenState::ConfigCalibration,
                    Some(MenuItem::Exit) | None => ScreenState::Main,
                };
                self.set_screen(next, now);
            }
            ScreenState::ConfigIso | ScreenState::ConfigType | ScreenState::ConfigCalibration => {
                self.set_screen(ScreenState::Main, now);
            }
        }
    }

    fn on_adjust(&mut self, direction: AdjustDirection, now: Instant) {
        use tracing::{debug, info};

        let command = match self.screen {
            ScreenState::Main => {
                debug!("Adjust {:?} ignored on main screen", direction);
                return;
            }
            ScreenState::Menu { selected_index } => {
                let len = MenuItem::ALL.len();
                let selected_index = match direction {
                    AdjustDirection::Up => (selected_index + 1) % len,
                    AdjustDirection::Down => (selected_index + len - 1) % len,
                };
                self.screen = ScreenState::Menu { selected_index };
                debug!("Menu selection moved to {}", self.screen);
                self.send_state_update();
                return;
            }
            ScreenState::ConfigIso => {
                self.settings.iso = step_iso(self.settings.iso, direction);
                info!("ISO adjusted to {}", self.settings.iso);
                Command::ConfigIso(self.settings.iso)
            }
            ScreenState::ConfigType => {
                self.settings.metering_mode =
                    step_metering_mode(self.settings.metering_mode, direction);
                info!("Metering mode adjusted to {}", self.settings.metering_mode);
                Command::ConfigType(self.settings.metering_mode)
            }
            ScreenState::ConfigCalibration => {
                self.settings.calibration = step_calibration(self.settings.calibration, direction);
                info!("Calibration adjusted to {}", self.settings.calibration);
                Command::ConfigCalibration(self.settings.calibration)
            }
        };

        self.config_deadline = Some(now + self.config_timeout);
        self.send_command(&command);
        self.send_state_update();
    }

    fn on_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        if self.transport.is_some() {
            self.on_device_line(line);
        } else {
            self.on_shell_line(line);
        }
    }

    fn on_device_line(&mut self, line: &str) {
        use tracing::debug;

        self.notify(Notification::Console(line.to_string()));

        let update = protocol::decode_line(line);
        if update.is_empty() {
            debug!("Device console: {}", line);
            return;
        }
        self.apply_response(update);
    }

    fn on_shell_line(&mut self, line: &str) {
        use tracing::debug;

        match Command::parse(line) {
            Ok(command) => self.execute_command(command),
            Err(e) => {
                debug!("Shell line '{}' not accepted", line);
                self.report_error(&e);
            }
        }
    }

    /// Apply decoded device output
    ///
    /// A mode confirmation is applied before the measurement summary, so a block
    /// carrying both yields the same state in either line order.
    pub fn apply_response(&mut self, update: ResponseUpdate) {
        use tracing::{info, warn};

        if update.is_empty() {
            return;
        }

        if let Some(mode) = update.metering_mode {
            info!("Device confirmed {} metering", mode);
            self.settings.metering_mode = mode;
            if let Some(measurement) = self.measurement.as_mut() {
                measurement.metering_mode = mode;
            }
        }

        if let Some(summary) = update.summary {
            if is_valid_iso(summary.iso) {
                self.settings.iso = summary.iso;
            } else {
                warn!(
                    "Device reported ISO {} which is not selectable, keeping ISO {}",
                    summary.iso, self.settings.iso
                );
            }
            info!(
                "Device measurement: EV {:.1}, {} at ISO {}",
                summary.ev, summary.shutter_speed, summary.iso
            );
            self.measurement = Some(MeasurementResult {
                ev: summary.ev,
                shutter_speed: summary.shutter_speed,
                iso: summary.iso,
                metering_mode: self.settings.metering_mode,
            });
        }

        self.send_state_update();
    }

    /// Execute a shell command against the local device state
    ///
    /// Every command answers with the console line the firmware prints.
    pub fn execute_command(&mut self, command: Command) {
        use tracing::info;

        match command {
            Command::ConfigIso(iso) => {
                let settings = DeviceSettings {
                    iso,
                    ..self.settings
                };
                if self.apply_settings(settings) {
                    self.console(format!("ISO configured to: {iso}"));
                }
            }
            Command::ConfigType(metering_mode) => {
                let settings = DeviceSettings {
                    metering_mode,
                    ..self.settings
                };
                if self.apply_settings(settings) {
                    self.console(format!("Metering type configured to: {metering_mode}"));
                }
            }
            Command::ConfigCalibration(calibration) => {
                let settings = DeviceSettings {
                    calibration,
                    ..self.settings
                };
                if self.apply_settings(settings) {
                    self.console(format!("Shutter speed calibration set to: {calibration:.2}"));
                }
            }
            Command::StartMeasure => {
                if self.screen == ScreenState::Main {
                    self.console("Measurement started".to_string());
                }
                self.trigger_measurement();
            }
            Command::Help => self.console(HELP_TEXT.to_string()),
            Command::Reset => {
                info!("Resetting device to defaults");
                self.console("Resetting device...".to_string());
                self.reset();
            }
        }
    }

    fn apply_settings(&mut self, settings: DeviceSettings) -> bool {
        use tracing::{debug, info};

        if let Err(e) = settings.validate() {
            debug!("Rejected settings {:?}", settings);
            self.report_error(&e);
            return false;
        }

        info!(
            "Settings: ISO {}, {} metering, calibration {}",
            settings.iso, settings.metering_mode, settings.calibration
        );
        self.settings = settings;
        self.send_state_update();
        true
    }

    /// Restore the power-on settings and return to the main screen
    pub fn reset(&mut self) {
        self.settings = DeviceSettings::default();
        self.screen = ScreenState::Main;
        self.config_deadline = None;
        self.send_state_update();
    }

    /// Measure if the main screen is showing, otherwise drop the request
    fn trigger_measurement(&mut self) {
        use tracing::debug;

        if self.screen != ScreenState::Main {
            debug!("Measurement request ignored on {}", self.screen);
            return;
        }

        if let Err(e) = self.measure() {
            self.report_error(&e);
        }
    }

    /// Take a measurement with the current settings
    ///
    /// With a device attached this only sends `start measure`; the result arrives
    /// later as device output. Otherwise the simulation provides the readings.
    pub fn measure(&mut self) -> Result<()> {
        use tracing::info;

        if self.transport.is_some() {
            info!("Requesting measurement from device");
            self.send_command(&Command::StartMeasure);
            if self.transport.is_some() {
                return Ok(());
            }
        }

        if !self.simulation_fallback {
            return Err(LightmeterError::NoMeasurementSource);
        }

        let DeviceSettings {
            iso,
            metering_mode,
            calibration,
        } = self.settings;
        let grid = self.simulation.generate(metering_mode);
        let result = compute(&grid, metering_mode, iso, calibration)?;

        info!(
            "Simulated measurement: EV {}, {} at ISO {} ({} metering)",
            result.ev_text(),
            result.shutter_speed,
            iso,
            metering_mode
        );

        self.console(protocol::render_measurement_dump(&grid, &result));
        self.grid = grid;
        self.measurement = Some(result);
        self.send_state_update();
        Ok(())
    }

    /// Send a command line to the device, if one is attached
    ///
    /// A closed transport is detached.
    fn send_command(&mut self, command: &Command) {
        use tracing::{debug, info, warn};

        let line = command.encode();
        let Some(transport) = &self.transport else {
            debug!("No device attached, '{}' not sent", line);
            return;
        };

        if transport.send(protocol::frame_line(&line)).is_ok() {
            info!("Sent '{}'", line);
        } else {
            warn!("Transport closed while sending '{}', detaching", line);
            self.transport = None;
        }
    }

    fn console(&self, text: String) {
        self.notify(Notification::Console(text));
    }

    fn report_error(&self, error: &LightmeterError) {
        use tracing::{error, warn};

        if error.is_invalid_argument() {
            warn!("Rejected input: {}", error);
        } else {
            error!("Request failed: {}", error);
        }
        self.notify(Notification::Error(get_user_friendly_error(error)));
    }

    /// Send current state to the renderer
    fn send_state_update(&self) {
        self.notify(Notification::StateChanged(self.display_state()));
    }

    /// Send the initial state so the renderer can draw the first screen
    pub fn send_initial_state(&self) {
        use tracing::info;

        info!("Sending initial state to renderer");
        self.send_state_update();
    }

    /// Deliver a notification, waiting while the renderer catches up
    fn notify(&self, notification: Notification) {
        use tracing::warn;

        if let Err(e) = self.notification_sender.send(notification) {
            warn!("Failed to send notification to renderer: {}", e);
        }
    }

    /// Spawn the serialized event loop in a background thread
    ///
    /// Events are handled one at a time under the controller lock. When no event
    /// arrives within `tick_interval` a `Tick` is delivered instead. The loop ends
    /// when every event sender has been dropped.
    pub fn spawn_event_loop(
        controller: Arc<Mutex<DeviceController>>,
        events: mpsc::Receiver<DeviceEvent>,
        tick_interval: Duration,
    ) -> std::thread::JoinHandle<()> {
        std::thread::spawn(move || {
            use std::sync::mpsc::RecvTimeoutError;
            use tracing::info;

            info!("Entering device event loop");
            loop {
                match events.recv_timeout(tick_interval) {
                    Ok(event) => controller.lock().handle_event(event),
                    Err(RecvTimeoutError::Timeout) => {
                        controller
                            .lock()
                            .handle_event(DeviceEvent::Tick(Instant::now()));
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        info!("Event channel closed, leaving device event loop");
                        break;
                    }
                }
            }
        })
    }
}
