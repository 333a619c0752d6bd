//! Metering mode definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Algorithm selecting which sensor cells contribute to the light estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeteringMode {
    /// Center-weighted average (the two center cells weigh 60%)
    #[default]
    Center,
    /// Matrix/evaluative: every cell with equal weight
    Matrix,
    /// Spot: the two center cells only
    Spot,
    /// Highlight: the brightest cell
    Highlight,
}

impl MeteringMode {
    /// All modes in menu order
    pub const ALL: [Self; 4] = [Self::Center, Self::Matrix, Self::Spot, Self::Highlight];

    /// Canonical lowercase name used on the wire (`config type <name>`)
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::Matrix => "matrix",
            Self::Spot => "spot",
            Self::Highlight => "highlight",
        }
    }

    /// Resolve a canonical mode name, case-insensitively
    ///
    /// Used for device responses (`Metering mode: <word>`), which only ever carry
    /// one of the four canonical names.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.wire_name().eq_ignore_ascii_case(name))
    }

    /// Resolve any of the accepted `config type` aliases, case-insensitively
    ///
    /// `center|central|center-weighted`, `matrix|evaluative`, `spot`,
    /// `highlight|highlights`.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.to_ascii_lowercase().as_str() {
            "center" | "central" | "center-weighted" => Some(Self::Center),
            "matrix" | "evaluative" => Some(Self::Matrix),
            "spot" => Some(Self::Spot),
            "highlight" | "highlights" => Some(Self::Highlight),
            _ => None,
        }
    }

    fn position(self) -> usize {
        match self {
            Self::Center => 0,
            Self::Matrix => 1,
            Self::Spot => 2,
            Self::Highlight => 3,
        }
    }

    /// Next mode in menu order, wrapping from `Highlight` to `Center`
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous mode in menu order, wrapping from `Center` to `Highlight`
    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for MeteringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(MeteringMode::from_alias("central"), Some(MeteringMode::Center));
        assert_eq!(
            MeteringMode::from_alias("Center-Weighted"),
            Some(MeteringMode::Center)
        );
        assert_eq!(MeteringMode::from_alias("evaluative"), Some(MeteringMode::Matrix));
        assert_eq!(MeteringMode::from_alias("SPOT"), Some(MeteringMode::Spot));
        assert_eq!(
            MeteringMode::from_alias("highlights"),
            Some(MeteringMode::Highlight)
        );
        assert_eq!(MeteringMode::from_alias("partial"), None);
    }

    #[test]
    fn test_wire_name_is_not_an_alias_table() {
        assert_eq!(MeteringMode::from_wire_name("Spot"), Some(MeteringMode::Spot));
        assert_eq!(MeteringMode::from_wire_name("evaluative"), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(MeteringMode::Highlight.next(), MeteringMode::Center);
        assert_eq!(MeteringMode::Center.previous(), MeteringMode::Highlight);
        for mode in MeteringMode::ALL {
            assert_eq!(mode.next().previous(), mode);
        }
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&MeteringMode::Highlight).unwrap();
        assert_eq!(json, "\"highlight\"");
        let mode: MeteringMode = serde_json::from_str("\"matrix\"").unwrap();
        assert_eq!(mode, MeteringMode::Matrix);
    }
}
