//! RGBA color type used by highlight themes.
//!
//! Colors are stored as floating-point components in `[0.0, 1.0]`, which keeps
//! theme definitions independent of the terminal's color depth. Renderers
//! convert with [`Rgba::to_rgb_u8`].
//!
//! # Examples
//!
//! ```
//! use incremental_highlight::Rgba;
//!
//! let comment = Rgba::from_hex("#928374").unwrap();
//! assert_eq!(comment.to_rgb_u8(), (0x92, 0x83, 0x74));
//! assert_eq!(comment.to_string(), "#928374");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// RGBA color with f32 components in range [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque red.
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Create a new RGBA color from f32 components.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from f32 RGB components.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create an opaque color from u8 RGB components.
    #[must_use]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, u8::MAX)
    }

    /// Create a color from u8 RGBA components.
    #[must_use]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: f32::from(a) / 255.0,
        }
    }

    /// Create an opaque color from a packed `0xRRGGBB` value.
    #[must_use]
    pub const fn from_packed_rgb(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
        )
    }

    /// Parse a hex color string (e.g., "#FF0000" or "FF0000").
    ///
    /// Supports 3-char (#RGB), 6-char (#RRGGBB), and 8-char (#RRGGBBAA) formats.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();

        match hex.len() {
            3 => {
                let r = channel(0..1)?;
                let g = channel(1..2)?;
                let b = channel(2..3)?;
                Some(Self::from_rgb_u8(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::from_rgb_u8(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Some(Self::from_rgba_u8(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => None,
        }
    }

    /// Convert to u8 RGB components (alpha is dropped).
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        (to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }

    /// Check if fully opaque.
    #[must_use]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }
}

fn to_u8(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Rgba {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| Error::InvalidColor(s.to_string()))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b) = self.to_rgb_u8();
        if self.is_opaque() {
            write!(f, "#{r:02X}{g:02X}{b:02X}")
        } else {
            let a = to_u8(self.a);
            write!(f, "#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgba::from_hex("#FF0000"), Some(Rgba::RED));
        assert_eq!(Rgba::from_hex("00FF00"), Some(Rgba::GREEN));
        assert_eq!(Rgba::from_hex("#00F"), Some(Rgba::BLUE));
        assert_eq!(Rgba::from_hex("#000000FF"), Some(Rgba::BLACK));
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#GGGGGG"), None);
        assert_eq!(Rgba::from_hex("#ééé"), None);
    }

    #[test]
    fn test_from_str_reports_invalid_color() {
        let err = "bogus".parse::<Rgba>().unwrap_err();
        assert!(matches!(err, Error::InvalidColor(ref s) if s == "bogus"));
        assert_eq!("#fabd2f".parse::<Rgba>().unwrap().to_rgb_u8(), (0xfa, 0xbd, 0x2f));
    }

    #[test]
    fn test_packed_rgb_matches_hex() {
        const GRUVBOX_BG: Rgba = Rgba::from_packed_rgb(0x28_28_28);
        assert_eq!(Some(GRUVBOX_BG), Rgba::from_hex("#282828"));
        assert_eq!(Rgba::from_packed_rgb(0xff_00_00), Rgba::RED);
    }

    #[test]
    fn test_display_round_trips_hex() {
        assert_eq!(Rgba::from_rgb_u8(0x28, 0x28, 0x28).to_string(), "#282828");
        assert_eq!(Rgba::TRANSPARENT.to_string(), "#00000000");
    }
}
