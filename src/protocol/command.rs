//! Command lines understood by the device
//!
//! The same grammar is used in both directions: the controller encodes commands
//! for a live device, and the headless shell parses the commands a user types.

use crate::error::{LightmeterError, Result};
use crate::exposure::{ISO_LADDER, MeteringMode, is_valid_iso};
use std::fmt;

/// Command list printed in reply to `help`
pub const HELP_TEXT: &str = "\
Available commands:
  config iso <value>         - Set ISO value (e.g., 100, 400, 800)
  config type <mode>         - Set metering type (center, matrix, spot, highlight)
  config calibration <value> - Set shutter speed calibration factor (default: 128.0)
  start measure              - Start light measurement
  help                       - Show this help
  reset                      - Reset the device";

/// One protocol command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `config iso <int>`
    ConfigIso(u32),
    /// `config type <mode>`
    ConfigType(MeteringMode),
    /// `config calibration <float>`
    ConfigCalibration(f64),
    /// `start measure`
    StartMeasure,
    /// `help`
    Help,
    /// `reset`
    Reset,
}

impl Command {
    /// Text of the command line, without the line terminator
    pub fn encode(&self) -> String {
        match self {
            Self::ConfigIso(iso) => format!("config iso {iso}"),
            Self::ConfigType(mode) => format!("config type {}", mode.wire_name()),
            Self::ConfigCalibration(calibration) => {
                format!("config calibration {}", format_decimal(*calibration))
            }
            Self::StartMeasure => "start measure".to_string(),
            Self::Help => "help".to_string(),
            Self::Reset => "reset".to_string(),
        }
    }

    /// Parse a command line typed into the headless shell
    ///
    /// Verbs are matched exactly. Surrounding whitespace and repeated blanks
    /// between words are ignored.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` for a missing, malformed or out-of-domain value, or
    ///   for trailing words after the value
    /// - `UnknownMeteringType` for a `config type` alias that names no mode
    /// - `UnknownCommand` for anything else
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.as_slice() {
            ["config", "iso", rest @ ..] => {
                parse_iso(single_value(rest, "ISO")?).map(Self::ConfigIso)
            }
            ["config", "type", rest @ ..] => {
                let alias = single_value(rest, "metering type")?;
                MeteringMode::from_alias(alias)
                    .map(Self::ConfigType)
                    .ok_or_else(|| LightmeterError::UnknownMeteringType(alias.to_string()))
            }
            ["config", "calibration", rest @ ..] => {
                parse_calibration(single_value(rest, "calibration")?).map(Self::ConfigCalibration)
            }
            ["start", "measure"] => Ok(Self::StartMeasure),
            ["help"] => Ok(Self::Help),
            ["reset"] => Ok(Self::Reset),
            _ => Err(LightmeterError::UnknownCommand(line.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Format a float so it always reads as one (`128` becomes `128.0`)
pub fn format_decimal(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{text}.0")
    }
}

fn single_value<'a>(rest: &[&'a str], what: &str) -> Result<&'a str> {
    match rest {
        [value] => Ok(*value),
        [] => Err(LightmeterError::InvalidArgument(format!("missing {what} value"))),
        [_, extra @ ..] => Err(LightmeterError::InvalidArgument(format!(
            "unexpected '{}' after {what} value",
            extra.join(" ")
        ))),
    }
}

fn parse_iso(text: &str) -> Result<u32> {
    let iso: u32 = text
        .parse()
        .map_err(|_| LightmeterError::InvalidArgument(format!("'{text}' is not an ISO speed")))?;
    if !is_valid_iso(iso) {
        return Err(LightmeterError::InvalidArgument(format!(
            "ISO {iso} is not one of {ISO_LADDER:?}"
        )));
    }
    Ok(iso)
}

fn parse_calibration(text: &str) -> Result<f64> {
    let calibration: f64 = text.parse().map_err(|_| {
        LightmeterError::InvalidArgument(format!("'{text}' is not a calibration factor"))
    })?;
    if !calibration.is_finite() || calibration <= 0.0 {
        return Err(LightmeterError::InvalidArgument(format!(
            "calibration {text} must be positive"
        )));
    }
    Ok(calibration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(Command::ConfigIso(400).encode(), "config iso 400");
        assert_eq!(
            Command::ConfigType(MeteringMode::Highlight).encode(),
            "config type highlight"
        );
        assert_eq!(
            Command::ConfigCalibration(128.0).encode(),
            "config calibration 128.0"
        );
        assert_eq!(
            Command::ConfigCalibration(140.8).encode(),
            "config calibration 140.8"
        );
        assert_eq!(Command::StartMeasure.to_string(), "start measure");
        assert_eq!(Command::Help.encode(), "help");
        assert_eq!(Command::Reset.encode(), "reset");
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("config iso 800").unwrap(), Command::ConfigIso(800));
        assert_eq!(
            Command::parse("  config   type  Evaluative ").unwrap(),
            Command::ConfigType(MeteringMode::Matrix)
        );
        assert_eq!(
            Command::parse("config calibration 96.5").unwrap(),
            Command::ConfigCalibration(96.5)
        );
        assert_eq!(Command::parse("start measure").unwrap(), Command::StartMeasure);
        assert_eq!(Command::parse("help").unwrap(), Command::Help);
        assert_eq!(Command::parse("reset").unwrap(), Command::Reset);
    }

    #[test]
    fn test_invalid_values() {
        for line in [
            "config iso abc",
            "config iso 123",
            "config iso -100",
            "config iso",
            "config iso 100 200",
            "config calibration zero",
            "config calibration 0",
            "config calibration -5",
            "config calibration inf",
            "config calibration NaN",
        ] {
            let err = Command::parse(line).unwrap_err();
            assert!(
                matches!(err, LightmeterError::InvalidArgument(_)),
                "{line}: {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_type_and_command() {
        assert!(matches!(
            Command::parse("config type partial"),
            Err(LightmeterError::UnknownMeteringType(alias)) if alias == "partial"
        ));
        for line in ["", "measure", "Help", "help me", "start", "config", "config shutter 5"] {
            assert!(
                matches!(Command::parse(line), Err(LightmeterError::UnknownCommand(_))),
                "{line}"
            );
        }
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(128.0), "128.0");
        assert_eq!(format_decimal(0.1), "0.1");
        assert_eq!(format_decimal(116.4), "116.4");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every encoded command parses back to itself
            #[test]
            fn encoded_commands_parse(
                iso in prop::sample::select(ISO_LADDER.to_vec()),
                mode in prop::sample::select(MeteringMode::ALL.to_vec()),
                tenths in 1u32..100_000,
            ) {
                let calibration = f64::from(tenths) / 10.0;
                for command in [
                    Command::ConfigIso(iso),
                    Command::ConfigType(mode),
                    Command::ConfigCalibration(calibration),
                    Command::StartMeasure,
                ] {
                    prop_assert_eq!(Command::parse(&command.encode()).unwrap(), command);
                }
            }

            /// Property: parsing arbitrary text never panics
            #[test]
            fn parse_never_panics(line in ".*") {
                let _ = Command::parse(&line);
            }
        }
    }
}
