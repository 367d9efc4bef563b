use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A colour, expressed in RGB, CMYK or grey colour spaces
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum Colour {
    /// DeviceRGB colour; r, g, b, range from 0.0 to 1.0
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK colour; c, m, y, and k range from 0.0 to 1.0
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray colour; g ranges from 0.0 to 1.0
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    /// Create a new colour in the RGB space. r, g, and b range from 0.0 to 1.0
    pub fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// Create a new colour in the RGB space. r, g, and b range from 0 to 255
    pub fn new_rgb_bytes(r: u8, g: u8, b: u8) -> Colour {
        Colour::RGB {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Create a new colour in the CMYK space. c, m, y, and k range from 0.0 to 1.0
    pub fn new_cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    /// Create a new colour in the Gray space, g ranges from 0.0 to 1.0
    pub fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Parse a `#RRGGBB` (or bare `RRGGBB`) hex colour. Anything malformed
    /// yields black, so a typo in a style never aborts a report.
    pub fn from_hex(hex: &str) -> Colour {
        hex.parse().unwrap_or(colours::BLACK)
    }

    /// Whether the colour is paper white. White backgrounds are never filled.
    pub fn is_white(&self) -> bool {
        match *self {
            Colour::RGB { r, g, b } => r >= 1.0 && g >= 1.0 && b >= 1.0,
            Colour::CMYK { c, m, y, k } => c <= 0.0 && m <= 0.0 && y <= 0.0 && k <= 0.0,
            Colour::Grey { g } => g >= 1.0,
        }
    }
}

/// Error returned when a string is not a `#RRGGBB` colour
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{0}` is not a #RRGGBB colour")]
pub struct ParseColourError(String);

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColourError(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ParseColourError(s.to_string()))
        };
        Ok(Colour::new_rgb_bytes(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from(c: (T, T, T)) -> Self {
        Colour::RGB {
            r: c.0.into(),
            g: c.1.into(),
            b: c.2.into(),
        }
    }
}

/// A list of pre-defined colour constants
pub mod colours {
    use super::*;

    pub const BLACK: Colour = Colour::Grey { g: 0.0 };
    pub const WHITE: Colour = Colour::Grey { g: 1.0 };
    /// The default fill of table cells and highlighted text, `#C0C0C0`
    pub const SILVER: Colour = Colour::RGB {
        r: 0.752_941_2,
        g: 0.752_941_2,
        b: 0.752_941_2,
    };
    pub const RED: Colour = Colour::RGB {
        r: 1.0,
        g: 0.0,
        b: 0.0,
    };
    pub const GREEN: Colour = Colour::RGB {
        r: 0.0,
        g: 1.0,
        b: 0.0,
    };
    pub const BLUE: Colour = Colour::RGB {
        r: 0.0,
        g: 0.0,
        b: 1.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_with_and_without_hash() {
        assert_eq!(Colour::from_hex("#FF0000"), colours::RED);
        assert_eq!(Colour::from_hex("00ff00"), colours::GREEN);
    }

    #[test]
    fn malformed_hex_is_black() {
        assert_eq!(Colour::from_hex("#FFF"), colours::BLACK);
        assert!("#GG0000".parse::<Colour>().is_err());
    }

    #[test]
    fn white_in_every_space() {
        assert!(Colour::from_hex("#FFFFFF").is_white());
        assert!(colours::WHITE.is_white());
        assert!(Colour::new_cmyk(0.0, 0.0, 0.0, 0.0).is_white());
        assert!(!colours::SILVER.is_white());
    }
}
