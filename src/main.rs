//! `lightmeter` - headless simulation shell
//!
//! Reads firmware console commands (`config iso 400`, `start measure`, `help`, ...)
//! from stdin, feeds them to the device controller and prints what the device
//! would print. Measurements come from the simulation model. Settings are saved
//! when stdin closes.

use anyhow::{Context, Result, anyhow};
use lightmeter::{
    config::ConfigManager,
    controller::{DeviceController, DisplayState, Notification},
    input::LineReader,
    utils,
};
use parking_lot::Mutex;
use std::sync::{Arc, mpsc};
use std::thread;
use tracing::{error, info};

/// Capacity of the event and notification queues
const CHANNEL_CAPACITY: usize = 64;

fn main() -> Result<()> {
    utils::init_logging(&ConfigManager::get_data_dir())
        .context("Failed to initialize logging system")?;

    let mut config = ConfigManager::load().context("Failed to load configuration")?;
    info!(
        "Configuration loaded: ISO {}, {} metering, calibration {}",
        config.device.iso, config.device.metering_mode, config.device.calibration
    );

    let (event_tx, event_rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
    let (notification_tx, notification_rx) = mpsc::sync_channel(CHANNEL_CAPACITY);

    let controller = DeviceController::new(config.device, &config.preferences, notification_tx)
        .context("Failed to create device controller")?;
    let controller = Arc::new(Mutex::new(controller));

    let renderer = thread::spawn(move || render_notifications(&notification_rx));

    controller.lock().send_initial_state();

    let event_loop = DeviceController::spawn_event_loop(
        Arc::clone(&controller),
        event_rx,
        config.preferences.tick_interval(),
    );

    info!("Reading commands from stdin");
    let reader = LineReader::new(std::io::stdin(), event_tx).start();

    reader
        .join()
        .map_err(|_| anyhow!("Input reader thread panicked"))?;
    event_loop
        .join()
        .map_err(|_| anyhow!("Device event loop panicked"))?;

    config.device = controller.lock().settings();
    if let Err(e) = ConfigManager::save(&config) {
        error!("Failed to save configuration: {}", e);
        eprintln!("{}", lightmeter::error::get_user_friendly_error(&e));
    }

    // Dropping the controller closes the notification queue
    drop(controller);
    renderer
        .join()
        .map_err(|_| anyhow!("Renderer thread panicked"))?;

    info!("lightmeter shutting down");

    Ok(())
}

/// Print notifications until the controller goes away
fn render_notifications(notifications: &mpsc::Receiver<Notification>) {
    for notification in notifications {
        match notification {
            Notification::Console(text) => println!("{text}"),
            Notification::Error(message) => eprintln!("{message}"),
            Notification::StateChanged(state) => println!("[{}]", status_line(&state)),
            Notification::InactivityTimeout(state) => {
                println!("[timeout] [{}]", status_line(&state));
            }
        }
    }
}

/// One-line summary of the display state
fn status_line(state: &DisplayState) -> String {
    let reading = state.measurement.as_ref().map_or_else(
        || "no reading".to_string(),
        |m| format!("{} (EV {})", m.shutter_speed, m.ev_text()),
    );
    format!(
        "{} | ISO {} | {} | cal {:.2} | {}",
        state.screen,
        state.settings.iso,
        state.settings.metering_mode,
        state.settings.calibration,
        reading
    )
}
