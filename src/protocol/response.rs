//! Device response decoding
//!
//! Two kinds of lines carry structured data; everything else the device prints
//! is console text with no effect:
//!
//! ```text
//! ISO 400, 1/250 (EV: 8.3)
//! ISO 100, 3.2 seconds (EV: 5.3)
//! Metering mode: spot
//! ```
//!
//! Matching is substring based: a summary or mode line may be embedded in
//! surrounding text, and the first occurrence on a line that fits the grammar
//! wins. EV and shutter must sit on the same line as `ISO <n>`.

use crate::exposure::{GRID_COLS, MeasurementResult, MeteringMode, SensorGrid};
use std::fmt::Write as _;

const SUMMARY_PREFIX: &str = "ISO ";
const EV_PREFIX: &str = "(EV: ";
const SECONDS: &str = "seconds";
const MODE_PREFIX: &str = "Metering mode: ";

/// Highest value of the 12-bit sensor ADC
pub const ADC_MAX: u16 = 4095;
/// ADC reference voltage
pub const ADC_REFERENCE_VOLTS: f64 = 3.3;

/// Measurement summary reported by the device
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementSummary {
    /// ISO the device metered for
    pub iso: u32,
    /// Shutter text, `1/<n>` or `<t> seconds`
    pub shutter_speed: String,
    /// Exposure value
    pub ev: f64,
}

/// Structured content of one line or block of device output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseUpdate {
    /// Measurement summary, if a summary line was present
    pub summary: Option<MeasurementSummary>,
    /// Confirmed metering mode, if a mode line with a known mode was present
    pub metering_mode: Option<MeteringMode>,
}

impl ResponseUpdate {
    /// Whether the text carried nothing structured
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.metering_mode.is_none()
    }
}

/// Decode one received line
pub fn decode_line(line: &str) -> ResponseUpdate {
    ResponseUpdate {
        summary: parse_measurement_summary(line),
        metering_mode: parse_metering_mode(line),
    }
}

/// Decode a multi-line block such as a measurement dump
///
/// Both patterns are looked for independently; for each, the first line that
/// matches wins.
pub fn decode_block(text: &str) -> ResponseUpdate {
    ResponseUpdate {
        summary: text.lines().find_map(parse_measurement_summary),
        metering_mode: text.lines().find_map(parse_metering_mode),
    }
}

/// Find `ISO <int>, <shutter>[ seconds] (EV: <float>)` within a line
///
/// The shutter token consists of digits, `/` and `.`; a trailing `seconds` is
/// kept as part of the shutter text. The EV token consists of digits and `.`.
pub fn parse_measurement_summary(line: &str) -> Option<MeasurementSummary> {
    line.match_indices(SUMMARY_PREFIX)
        .find_map(|(start, _)| summary_at(&line[start + SUMMARY_PREFIX.len()..]))
}

fn summary_at(text: &str) -> Option<MeasurementSummary> {
    let (iso_text, rest) = take_while(text, |c| c.is_ascii_digit());
    let rest = rest.strip_prefix(", ")?;
    let (shutter, rest) = take_while(rest, |c| c.is_ascii_digit() || c == '/' || c == '.');

    let rest = rest.trim_start();
    let (has_seconds, rest) = match rest.strip_prefix(SECONDS) {
        Some(after) => (true, after.trim_start()),
        None => (false, rest),
    };

    let rest = rest.strip_prefix(EV_PREFIX)?;
    let (ev_text, rest) = take_while(rest, |c| c.is_ascii_digit() || c == '.');
    rest.strip_prefix(')')?;

    if iso_text.is_empty() || shutter.is_empty() || ev_text.is_empty() {
        return None;
    }

    Some(MeasurementSummary {
        iso: iso_text.parse().ok()?,
        shutter_speed: if has_seconds {
            format!("{shutter} {SECONDS}")
        } else {
            shutter.to_string()
        },
        ev: ev_text.parse().ok().filter(|ev: &f64| ev.is_finite())?,
    })
}

/// Find `Metering mode: <word>` within a line and resolve the word
///
/// Returns `None` when no mode line is present or when the word names no
/// known mode.
pub fn parse_metering_mode(line: &str) -> Option<MeteringMode> {
    let word = line.match_indices(MODE_PREFIX).find_map(|(start, _)| {
        let (word, _) = take_while(&line[start + MODE_PREFIX.len()..], |c| {
            c.is_alphanumeric() || c == '_'
        });
        (!word.is_empty()).then_some(word)
    })?;

    let mode = MeteringMode::from_wire_name(&word.to_lowercase());
    if mode.is_none() {
        tracing::debug!("Ignoring unknown metering mode '{}' in device response", word);
    }
    mode
}

fn take_while(text: &str, predicate: impl Fn(char) -> bool) -> (&str, &str) {
    let end = text
        .char_indices()
        .find(|&(_, c)| !predicate(c))
        .map_or(text.len(), |(index, _)| index);
    text.split_at(end)
}

/// Simulated ADC reading for a lux value
pub fn simulated_adc(lux: f64) -> u16 {
    // Saturating float-to-int cast, then clamp to the 12-bit range
    ((lux * 2.0) as u16).min(ADC_MAX)
}

/// Render the detailed measurement block the device prints after metering
///
/// The table shows ADC value, voltage and lux per cell, followed by the two
/// summary lines that [`decode_block`] understands.
pub fn render_measurement_dump(grid: &SensorGrid, result: &MeasurementResult) -> String {
    let mut out = String::new();
    out.push_str("================= DETAILED MEASUREMENTS =================\n");
    out.push_str("    | Column 1      | Column 2      | Column 3      | Column 4      |\n");
    out.push_str("Row | ADC  V    Lux | ADC  V    Lux | ADC  V    Lux | ADC  V    Lux |\n");
    out.push_str("----+");
    out.push_str(&"---------------+".repeat(GRID_COLS));
    out.push('\n');

    for (row, values) in grid.rows().iter().enumerate() {
        let _ = write!(out, " {}  |", row + 1);
        for &lux in values {
            let adc = simulated_adc(lux);
            let volts = f64::from(adc) * ADC_REFERENCE_VOLTS / f64::from(ADC_MAX);
            let _ = write!(out, " {adc:4} {volts:.2}V {lux:5.1} |");
        }
        out.push('\n');
    }

    out.push_str("===========================================================\n\n");
    let [summary, mode] = result.response_lines();
    out.push_str(&summary);
    out.push('\n');
    out.push_str(&mode);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::compute;

    #[test]
    fn test_decode_summary_line() {
        let update = decode_line("ISO 400, 1/250 (EV: 8.3)");
        let summary = update.summary.unwrap();
        assert_eq!(summary.iso, 400);
        assert_eq!(summary.shutter_speed, "1/250");
        assert!((summary.ev - 8.3).abs() < 1e-9);
        assert_eq!(update.metering_mode, None);
    }

    #[test]
    fn test_decode_seconds_suffix() {
        let summary = parse_measurement_summary("ISO 100, 3.2 seconds (EV: 5.3)").unwrap();
        assert_eq!(summary.shutter_speed, "3.2 seconds");

        let compact = parse_measurement_summary("ISO 100, 3.2seconds(EV: 5.3)").unwrap();
        assert_eq!(compact.shutter_speed, "3.2 seconds");
    }

    #[test]
    fn test_summary_embedded_in_text() {
        let line = "Exposure recommendation: ISO 800, 1/60 (EV: 9.9) [TTL]";
        let summary = parse_measurement_summary(line).unwrap();
        assert_eq!(summary.iso, 800);
        assert_eq!(summary.shutter_speed, "1/60");
    }

    #[test]
    fn test_first_matching_occurrence_wins() {
        let line = "ISO unknown; ISO 200, 1/30 (EV: 7.0)";
        assert_eq!(parse_measurement_summary(line).unwrap().iso, 200);
    }

    #[test]
    fn test_non_matching_summaries() {
        for line in [
            "ISO configured to: 400",
            "ISO 400 1/250 (EV: 8.3)",
            "ISO 400, 1/250 (EV: -2.0)",
            "ISO 400, 1/250 (EV: 8.3",
            "ISO 400, (EV: 8.3)",
            "ISO 400, fast (EV: 8.3)",
            "iso 400, 1/250 (EV: 8.3)",
            "ISO 400, 1/250 (EV: 1.2.3)",
        ] {
            assert_eq!(parse_measurement_summary(line), None, "{line}");
        }
    }

    #[test]
    fn test_metering_mode_line() {
        assert_eq!(parse_metering_mode("Metering mode: spot"), Some(MeteringMode::Spot));
        assert_eq!(
            parse_metering_mode("Metering mode: HIGHLIGHT"),
            Some(MeteringMode::Highlight)
        );
        assert_eq!(parse_metering_mode("Metering mode: partial"), None);
        assert_eq!(parse_metering_mode("Metering mode: "), None);
        assert_eq!(parse_metering_mode("Metering type configured to: spot"), None);
    }

    #[test]
    fn test_unrelated_line_is_empty() {
        assert!(decode_line("Measurement started").is_empty());
        assert!(decode_line("").is_empty());
    }

    #[test]
    fn test_block_is_order_insensitive() {
        let forward = decode_block("ISO 200, 1/15 (EV: 6.0)\nMetering mode: matrix\n");
        let reverse = decode_block("Metering mode: matrix\r\nnoise\r\nISO 200, 1/15 (EV: 6.0)\r\n");
        assert_eq!(forward, reverse);
        assert_eq!(forward.metering_mode, Some(MeteringMode::Matrix));
    }

    #[test]
    fn test_dump_decodes_to_its_result() {
        let grid = SensorGrid::uniform(100.0).unwrap();
        let result = compute(&grid, MeteringMode::Matrix, 100, 128.0).unwrap();
        let dump = render_measurement_dump(&grid, &result);

        assert!(dump.contains("DETAILED MEASUREMENTS"));
        assert!(dump.contains(" 1  |  200 0.16V 100.0 |"));
        assert_eq!(dump.lines().filter(|l| l.ends_with('|')).count(), 7);

        let update = decode_block(&dump);
        let summary = update.summary.unwrap();
        assert_eq!(summary.iso, result.iso);
        assert_eq!(summary.shutter_speed, result.shutter_speed);
        assert_eq!(format!("{:.1}", summary.ev), result.ev_text());
        assert_eq!(update.metering_mode, Some(MeteringMode::Matrix));
    }

    #[test]
    fn test_simulated_adc_saturates() {
        assert_eq!(simulated_adc(0.0), 0);
        assert_eq!(simulated_adc(100.0), 200);
        assert_eq!(simulated_adc(3000.0), ADC_MAX);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: decoding arbitrary text never panics
            #[test]
            fn decode_never_panics(text in "\\PC*") {
                let _ = decode_block(&text);
            }

            /// Property: a well-formed summary line is recognized inside any prefix
            #[test]
            fn summary_found_after_prefix(
                prefix in "[a-z :]{0,20}",
                iso in 1u32..100_000,
                denominator in 1u32..10_000,
                tenths in 0u32..200,
            ) {
                let ev = f64::from(tenths) / 10.0;
                let line = format!("{prefix}ISO {iso}, 1/{denominator} (EV: {ev:.1})");
                let summary = parse_measurement_summary(&line).unwrap();
                prop_assert_eq!(summary.iso, iso);
                prop_assert_eq!(summary.shutter_speed, format!("1/{denominator}"));
                prop_assert!((summary.ev - ev).abs() < 1e-9);
            }
        }
    }
}
