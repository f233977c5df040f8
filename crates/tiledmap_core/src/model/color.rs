use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// An sRGB color with alpha, as written in `#AARRGGBB` or `#RRGGBB` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Parse `#AARRGGBB` or `#RRGGBB`; the leading `#` is optional.
    ///
    /// Six-digit colors are fully opaque.
    pub fn parse(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        // `from_str_radix` alone would accept a sign.
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Self::rgba(byte(2)?, byte(4)?, byte(6)?, byte(0)?)),
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or_else(|| Error::format("color", s))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            self.alpha, self.red, self.green, self.blue
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_argb() {
        assert_eq!(
            Color::parse("#80ff0010"),
            Some(Color::rgba(255, 0, 16, 128))
        );
    }

    #[test]
    fn test_parse_rgb_is_opaque() {
        assert_eq!(Color::parse("ff8040"), Some(Color::rgb(255, 128, 64)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(Color::parse("#fff"), None);
        assert_eq!(Color::parse("#gg000000"), None);
        assert!("#12345".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_rejects_signed_digits() {
        assert_eq!(Color::parse("#+1+2+3"), None);
        assert_eq!(Color::parse("+1+2+3+4"), None);
        assert_eq!(Color::parse("#-1-2-3"), None);
    }

    #[test]
    fn test_display_round_trips() {
        let color = Color::rgba(1, 2, 3, 4);
        assert_eq!(color.to_string(), "#04010203");
        assert_eq!(color.to_string().parse::<Color>().unwrap(), color);
    }
}
