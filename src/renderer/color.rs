//! Packed 32-bit colors
//!
//! Layout is `0xAARRGGBB`, which is what a little-endian 32-bit BGRA
//! surface expects when the buffer is blitted as-is.

use std::fmt;
use std::str::FromStr;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A packed `0xAARRGGBB` pixel value. Any `u32` is a legal color.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);
    pub const GREEN: Color = Color(0xFF00_FF00);
    pub const RED: Color = Color(0xFFFF_0000);
    pub const BLUE: Color = Color(0xFF00_00FF);
    pub const YELLOW: Color = Color(0xFFFF_FF00);
    pub const MAGENTA: Color = Color(0xFFFF_00FF);
    pub const CYAN: Color = Color(0xFF00_FFFF);
    pub const PINK: Color = Color(0xFFF6_A5D1);

    /// Named palette, in declaration order
    pub const PALETTE: [(&'static str, Color); 9] = [
        ("black", Color::BLACK),
        ("white", Color::WHITE),
        ("green", Color::GREEN),
        ("red", Color::RED),
        ("blue", Color::BLUE),
        ("yellow", Color::YELLOW),
        ("magenta", Color::MAGENTA),
        ("cyan", Color::CYAN),
        ("pink", Color::PINK),
    ];

    #[inline]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    #[inline]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Channels in RGBA byte order (canvas `ImageData` layout)
    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        [self.red(), self.green(), self.blue(), self.alpha()]
    }

    /// Palette name, if this is one of the named constants
    pub fn name(self) -> Option<&'static str> {
        Self::PALETTE
            .iter()
            .find(|(_, c)| *c == self)
            .map(|(name, _)| *name)
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lower = trimmed.to_lowercase();
        if let Some((_, c)) = Self::PALETTE.iter().find(|(name, _)| *name == lower) {
            return Ok(*c);
        }

        let hex = lower
            .strip_prefix('#')
            .or_else(|| lower.strip_prefix("0x"))
            .ok_or_else(|| ConfigError::Color(trimmed.to_string()))?;
        let value =
            u32::from_str_radix(hex, 16).map_err(|_| ConfigError::Color(trimmed.to_string()))?;
        match hex.len() {
            // RGB only, opaque
            6 => Ok(Color(0xFF00_0000 | value)),
            8 => Ok(Color(value)),
            _ => Err(ConfigError::Color(trimmed.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        match c.name() {
            Some(name) => name.to_string(),
            None => c.to_string(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels() {
        let c = Color::from_argb(0x80, 0x12, 0x34, 0x56);
        assert_eq!(c.0, 0x8012_3456);
        assert_eq!(c.to_rgba(), [0x12, 0x34, 0x56, 0x80]);
        assert_eq!(Color::PINK.to_rgba(), [0xF6, 0xA5, 0xD1, 0xFF]);
    }

    #[test]
    fn test_parse_names_and_hex() {
        assert_eq!("red".parse::<Color>().unwrap(), Color::RED);
        assert_eq!(" Cyan ".parse::<Color>().unwrap(), Color::CYAN);
        assert_eq!("#00FF00".parse::<Color>().unwrap(), Color::GREEN);
        assert_eq!("#80123456".parse::<Color>().unwrap(), Color(0x8012_3456));
        assert_eq!("0xFFF6A5D1".parse::<Color>().unwrap(), Color::PINK);
        assert!("mauve".parse::<Color>().is_err());
        assert!("#12345".parse::<Color>().is_err());
        assert!("#GGGGGG".parse::<Color>().is_err());
    }

    #[test]
    fn test_serde_uses_names_when_possible() {
        let json = serde_json::to_string(&Color::YELLOW).unwrap();
        assert_eq!(json, "\"yellow\"");
        let json = serde_json::to_string(&Color(0x0102_0304)).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color(0x0102_0304));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
