//! Hex color handling for the trajectory stroke color.
//!
//! The color is cosmetic for the engine itself; it is carried on the session,
//! persisted with the settings and used by snapshot rendering.

use crate::error::AttractorError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 8-bit sRGB color. Serializes as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Parses `#rrggbb`, `rrggbb`, `#rgb` or `rgb` (case insensitive).
    pub fn from_hex(hex: &str) -> Result<Color, AttractorError> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if !digits.is_ascii() {
            return Err(AttractorError::InvalidColor(format!("non-ascii color '{hex}'")));
        }
        let channel = |s: &str| {
            u8::from_str_radix(s, 16)
                .map_err(|e| AttractorError::InvalidColor(format!("'{hex}': {e}")))
        };
        match digits.len() {
            6 => Ok(Color {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            }),
            3 => {
                // #abc expands to #aabbcc
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                Ok(Color {
                    r: r * 17,
                    g: g * 17,
                    b: b * 17,
                })
            }
            n => Err(AttractorError::InvalidColor(format!(
                "expected 3 or 6 hex digits in '{hex}', got {n}"
            ))),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// RGBA bytes with the given alpha.
    pub fn with_alpha(self, a: u8) -> [u8; 4] {
        [self.r, self.g, self.b, a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = AttractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form_with_and_without_hash() {
        assert_eq!(
            Color::from_hex("#ff8000").unwrap(),
            Color { r: 255, g: 128, b: 0 }
        );
        assert_eq!(
            Color::from_hex("00FF7f").unwrap(),
            Color { r: 0, g: 255, b: 127 }
        );
    }

    #[test]
    fn parses_short_form() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::from_hex("#1a2").unwrap(),
            Color { r: 0x11, g: 0xaa, b: 0x22 }
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(Color::from_hex("").is_err());
        assert!(Color::from_hex("#ggg").is_err());
        assert!(Color::from_hex("#ffff").is_err());
        assert!(Color::from_hex("#ff00ff00").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn hex_round_trip() {
        let c: Color = "#c0ffee".parse().unwrap();
        assert_eq!(c.to_hex(), "#c0ffee");
        assert_eq!(c.to_string(), "#c0ffee");
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Color { r: 1, g: 2, b: 3 }).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn deserializing_garbage_fails() {
        assert!(serde_json::from_str::<Color>("\"blue\"").is_err());
    }

    #[test]
    fn with_alpha_appends_channel() {
        assert_eq!(Color::WHITE.with_alpha(7), [255, 255, 255, 7]);
    }
}
