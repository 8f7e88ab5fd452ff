// ── Hex color ──

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A strict `#RRGGBB` color, stored lowercase.
///
/// Shorthand (`#fff`), alpha (`#ffffffff`) and named colors are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

/// Returned when a string is not a `#RRGGBB` color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected '#' followed by exactly 6 hex digits, got {0:?}")]
pub struct InvalidHexColor(pub String);

impl HexColor {
    pub fn parse(raw: &str) -> Result<Self, InvalidHexColor> {
        let valid = raw
            .strip_prefix('#')
            .is_some_and(|hex| hex.len() == 6 && hex.bytes().all(|b| b.is_ascii_hexdigit()));
        if valid {
            Ok(Self(raw.to_ascii_lowercase()))
        } else {
            Err(InvalidHexColor(raw.to_owned()))
        }
    }

    pub fn black() -> Self {
        Self("#000000".into())
    }

    pub fn white() -> Self {
        Self("#ffffff".into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels.
    pub fn rgb(&self) -> [u8; 3] {
        let channel = |range: std::ops::Range<usize>| {
            self.0
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .unwrap_or_default()
        };
        [channel(1..3), channel(3..5), channel(5..7)]
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = InvalidHexColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for HexColor {
    type Error = InvalidHexColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_hex_digits() {
        assert_eq!(HexColor::parse("#ffffff").unwrap().as_str(), "#ffffff");
        assert_eq!(HexColor::parse("#1A2b3C").unwrap().as_str(), "#1a2b3c");
    }

    #[test]
    fn rejects_invalid_digits() {
        assert!(HexColor::parse("#12G456").is_err());
    }

    #[test]
    fn rejects_wrong_shape() {
        for raw in ["", "#", "ffffff", "#fff", "#fffffff", "#ffffffff", " #ffffff", "red"] {
            assert!(HexColor::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn rejects_multibyte_of_matching_length() {
        assert!(HexColor::parse("#ééé").is_err());
    }

    #[test]
    fn rgb_channels() {
        assert_eq!(HexColor::parse("#ff8000").unwrap().rgb(), [255, 128, 0]);
        assert_eq!(HexColor::black().rgb(), [0, 0, 0]);
        assert_eq!(HexColor::white().rgb(), [255, 255, 255]);
    }

    #[test]
    fn serde_round_trips_through_string() {
        let color: HexColor = serde_json::from_str("\"#ABCDEF\"").unwrap();
        assert_eq!(color.as_str(), "#abcdef");
        assert_eq!(serde_json::to_string(&color).unwrap(), "\"#abcdef\"");
        assert!(serde_json::from_str::<HexColor>("\"#abc\"").is_err());
    }
}
