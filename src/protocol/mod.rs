//! Device protocol module
//!
//! Text line protocol between the controller and the lightmeter firmware.
//! One command or response per line, CRLF-terminated, ASCII.
//!
//! # Overview
//!
//! - `command`: `Command` encoding for the device and parsing for the headless
//!   shell (`config iso|type|calibration`, `start measure`, `help`, `reset`)
//! - `response`: decoding of measurement summaries and mode confirmations, and
//!   rendering of the detailed measurement dump
//! - `framing`: CRLF framing and byte-stream line assembly
//!
//! Decoding is stateless and line-at-a-time. Lines that match no pattern are
//! plain console text and are not an error.
//!
//! # Example Usage
//!
//! ```
//! use lightmeter::exposure::MeteringMode;
//! use lightmeter::protocol::{Command, decode_line, frame_line};
//!
//! assert_eq!(frame_line(&Command::ConfigIso(400).encode()), "config iso 400\r\n");
//!
//! let update = decode_line("Metering mode: spot");
//! assert_eq!(update.metering_mode, Some(MeteringMode::Spot));
//! ```

pub mod command;
pub mod framing;
pub mod response;

pub use command::{Command, HELP_TEXT, format_decimal};
pub use framing::{LINE_TERMINATOR, LineBuffer, frame_line};
pub use response::{
    MeasurementSummary, ResponseUpdate, decode_block, decode_line, parse_measurement_summary,
    parse_metering_mode, render_measurement_dump,
};
