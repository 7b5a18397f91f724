//! Color representation

use std::fmt;

/// Color used by fonts, fills and borders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Automatic/default color
    #[default]
    Auto,

    /// RGB color
    Rgb { r: u8, g: u8, b: u8 },
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Parse `RRGGBB` or `#RRGGBB`; an 8-digit `AARRGGBB` value drops the alpha
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        let hex = match hex.len() {
            6 => hex,
            8 => &hex[2..],
            _ => return None,
        };
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some(Self::from_rgb_u32(value))
    }

    /// Build from a `0xRRGGBB` value
    pub const fn from_rgb_u32(value: u32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// `0xRRGGBB` value, `None` for automatic
    pub fn to_rgb_u32(&self) -> Option<u32> {
        match self {
            Color::Auto => None,
            Color::Rgb { r, g, b } => {
                Some((u32::from(*r) << 16) | (u32::from(*g) << 8) | u32::from(*b))
            }
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Color::Auto)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Auto => f.write_str("auto"),
            Color::Rgb { r, g, b } => write!(f, "#{r:02X}{g:02X}{b:02X}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        let color = Color::from_hex("#33CCCC").unwrap();
        assert_eq!(color, Color::rgb(0x33, 0xCC, 0xCC));
        assert_eq!(color.to_string(), "#33CCCC");
        assert_eq!(Color::from_hex("FF00FF00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(Color::from_hex("12345"), None);
        assert_eq!(Color::Auto.to_rgb_u32(), None);
    }
}
