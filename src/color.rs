//! Hex colors for foreground, background and chroma-key comparisons.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use resvg::tiny_skia;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// An opaque-by-default RGBA color.
///
/// Serializes as a lowercase `#rrggbb` string, the format color pickers
/// produce. Parsing accepts `#rrggbb`, `rrggbb`, `#rgb` and `rgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Euclidean distance between the RGB channels of two colors.
    ///
    /// Alpha is ignored.
    pub fn rgb_distance(&self, other: &Self) -> f32 {
        let dr = self.r as f32 - other.r as f32;
        let dg = self.g as f32 - other.g as f32;
        let db = self.b as f32 - other.b as f32;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Formats the RGB channels as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:x}", Srgb::new(self.r, self.g, self.b))
    }

    pub(crate) fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rgb: Srgb<u8> = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidColor(s.to_string()))?;
        Ok(Self::rgb(rgb.red, rgb.green, rgb.blue))
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(px: image::Rgba<u8>) -> Self {
        let [r, g, b, a] = px.0;
        Self { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!("#ff8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("FF8000".parse::<Color>().unwrap(), Color::rgb(255, 128, 0));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            "not-a-color".parse::<Color>(),
            Err(Error::InvalidColor(_))
        ));
    }

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(Color::rgb(10, 0, 255).to_hex(), "#0a00ff");
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(0x12, 0x34, 0x56)).unwrap();
        assert_eq!(json, "\"#123456\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(0x12, 0x34, 0x56));
    }

    #[test]
    fn distance_ignores_alpha() {
        let a = Color::rgba(0, 0, 0, 0);
        let b = Color::rgba(3, 4, 0, 255);
        assert_eq!(a.rgb_distance(&b), 5.0);
    }
}
