//! Hex color helpers
//!
//! Balloon colors are stored as [`Rgb`] and only turned into CSS strings at
//! the display boundary.

use std::fmt;

use thiserror::Error;

/// Malformed color input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("expected 6 hex digits, got {0:?}")]
    Length(String),
    #[error("invalid hex digit in {0:?}")]
    Digit(String),
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the `#` is optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(ColorError::Length(hex.to_string()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::Digit(hex.to_string()));
        }
        let num = u32::from_str_radix(digits, 16).map_err(|_| ColorError::Digit(hex.to_string()))?;
        Ok(Self::new((num >> 16) as u8, (num >> 8) as u8, num as u8))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Add `round(amount * 255)` to every channel, clamped to [0, 255]
    pub fn lighten(self, amount: f32) -> Self {
        let delta = (255.0 * amount).round() as i32;
        let channel = |c: u8| (c as i32 + delta).clamp(0, 255) as u8;
        Self::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Lighten a hex color string, returning the new hex string
pub fn lighten(hex: &str, amount: f32) -> Result<String, ColorError> {
    Ok(Rgb::from_hex(hex)?.lighten(amount).to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_and_encode() {
        let c = Rgb::from_hex("#4D96FF").unwrap();
        assert_eq!(c, Rgb::new(0x4D, 0x96, 0xFF));
        assert_eq!(c.to_hex(), "#4d96ff");
        assert_eq!(Rgb::from_hex("ff9f1c").unwrap(), Rgb::new(0xFF, 0x9F, 0x1C));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Rgb::from_hex("#FFF"), Err(ColorError::Length(_))));
        assert!(matches!(Rgb::from_hex("#GG0000"), Err(ColorError::Digit(_))));
        assert!(matches!(Rgb::from_hex("+fffff"), Err(ColorError::Digit(_))));
        assert!(lighten("", 0.5).is_err());
    }

    #[test]
    fn test_lighten_black() {
        // round(255 * 0.6) = 153 = 0x99
        assert_eq!(lighten("#000000", 0.6).unwrap(), "#999999");
    }

    #[test]
    fn test_lighten_palette_color() {
        // 0xFF6B6B + 153 per channel -> ff, 0x6B + 0x99 = 0x104 clamps to ff
        assert_eq!(lighten("#FF6B6B", 0.6).unwrap(), "#ffffff");
        // 0x4D + 0x99 = 0xE6
        assert_eq!(lighten("#4D96FF", 0.6).unwrap(), "#e6ffff");
    }

    #[test]
    fn test_lighten_zero_is_identity() {
        assert_eq!(Rgb::new(1, 2, 3).lighten(0.0), Rgb::new(1, 2, 3));
    }

    proptest! {
        #[test]
        fn white_stays_white(amount in 0.0f32..10.0) {
            prop_assert_eq!(lighten("#FFFFFF", amount).unwrap(), "#ffffff");
        }

        #[test]
        fn lighten_never_darkens(r in any::<u8>(), g in any::<u8>(), b in any::<u8>(), amount in 0.0f32..1.0) {
            let c = Rgb::new(r, g, b);
            let l = c.lighten(amount);
            prop_assert!(l.r >= c.r && l.g >= c.g && l.b >= c.b);
        }
    }
}
