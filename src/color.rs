//! Color types for chat markup.
//!
//! Supports the sixteen legacy named colors, hex RGB, and reset.

use crate::error::ParseError;

/// One of the sixteen legacy chat colors.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkAqua,
    DarkRed,
    DarkPurple,
    Gold,
    Gray,
    DarkGray,
    Blue,
    Green,
    Aqua,
    Red,
    LightPurple,
    Yellow,
    White,
}

impl NamedColor {
    /// All sixteen colors, in legacy code order (`0` through `f`).
    pub const ALL: [NamedColor; 16] = [
        NamedColor::Black,
        NamedColor::DarkBlue,
        NamedColor::DarkGreen,
        NamedColor::DarkAqua,
        NamedColor::DarkRed,
        NamedColor::DarkPurple,
        NamedColor::Gold,
        NamedColor::Gray,
        NamedColor::DarkGray,
        NamedColor::Blue,
        NamedColor::Green,
        NamedColor::Aqua,
        NamedColor::Red,
        NamedColor::LightPurple,
        NamedColor::Yellow,
        NamedColor::White,
    ];

    /// The single-character legacy code for this color.
    pub fn code(self) -> char {
        match self {
            NamedColor::Black => '0',
            NamedColor::DarkBlue => '1',
            NamedColor::DarkGreen => '2',
            NamedColor::DarkAqua => '3',
            NamedColor::DarkRed => '4',
            NamedColor::DarkPurple => '5',
            NamedColor::Gold => '6',
            NamedColor::Gray => '7',
            NamedColor::DarkGray => '8',
            NamedColor::Blue => '9',
            NamedColor::Green => 'a',
            NamedColor::Aqua => 'b',
            NamedColor::Red => 'c',
            NamedColor::LightPurple => 'd',
            NamedColor::Yellow => 'e',
            NamedColor::White => 'f',
        }
    }

    /// Look up a color by its legacy code, case-insensitively.
    pub fn from_code(c: char) -> Option<Self> {
        let c = c.to_ascii_lowercase();
        NamedColor::ALL.iter().copied().find(|n| n.code() == c)
    }

    /// The canonical lowercase name for this color.
    pub fn name(self) -> &'static str {
        match self {
            NamedColor::Black => "black",
            NamedColor::DarkBlue => "dark_blue",
            NamedColor::DarkGreen => "dark_green",
            NamedColor::DarkAqua => "dark_aqua",
            NamedColor::DarkRed => "dark_red",
            NamedColor::DarkPurple => "dark_purple",
            NamedColor::Gold => "gold",
            NamedColor::Gray => "gray",
            NamedColor::DarkGray => "dark_gray",
            NamedColor::Blue => "blue",
            NamedColor::Green => "green",
            NamedColor::Aqua => "aqua",
            NamedColor::Red => "red",
            NamedColor::LightPurple => "light_purple",
            NamedColor::Yellow => "yellow",
            NamedColor::White => "white",
        }
    }

    /// Look up a color by name, case-insensitively. Accepts `grey` spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "grey" => return Some(NamedColor::Gray),
            "dark_grey" => return Some(NamedColor::DarkGray),
            _ => {}
        }
        NamedColor::ALL.iter().copied().find(|n| n.name() == name)
    }

    /// The RGB components this color renders as.
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0x00, 0x00, 0x00),
            NamedColor::DarkBlue => (0x00, 0x00, 0xaa),
            NamedColor::DarkGreen => (0x00, 0xaa, 0x00),
            NamedColor::DarkAqua => (0x00, 0xaa, 0xaa),
            NamedColor::DarkRed => (0xaa, 0x00, 0x00),
            NamedColor::DarkPurple => (0xaa, 0x00, 0xaa),
            NamedColor::Gold => (0xff, 0xaa, 0x00),
            NamedColor::Gray => (0xaa, 0xaa, 0xaa),
            NamedColor::DarkGray => (0x55, 0x55, 0x55),
            NamedColor::Blue => (0x55, 0x55, 0xff),
            NamedColor::Green => (0x55, 0xff, 0x55),
            NamedColor::Aqua => (0x55, 0xff, 0xff),
            NamedColor::Red => (0xff, 0x55, 0x55),
            NamedColor::LightPurple => (0xff, 0x55, 0xff),
            NamedColor::Yellow => (0xff, 0xff, 0x55),
            NamedColor::White => (0xff, 0xff, 0xff),
        }
    }
}

/// A color value carried by a styled run.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Color {
    /// One of the sixteen legacy colors.
    Named(NamedColor),
    /// An arbitrary RGB color.
    Rgb(u8, u8, u8),
    /// Explicit return to the rendering default.
    Reset,
}

impl Color {
    /// Parse a color token.
    ///
    /// Supports:
    /// - Hex colors: `#RGB`, `#RRGGBB`
    /// - Named colors: `gold`, `dark_aqua`, ...
    /// - `reset`
    ///
    /// # Examples
    ///
    /// ```
    /// use chatdown::Color;
    ///
    /// let hex = Color::parse("#ff5733").unwrap();
    /// assert_eq!(hex, Color::Rgb(255, 87, 51));
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        if input.eq_ignore_ascii_case("reset") {
            return Ok(Color::Reset);
        }
        NamedColor::from_name(input)
            .map(Color::Named)
            .ok_or_else(|| ParseError::InvalidColorToken(input.to_string()))
    }

    /// Parse a hex color (without the `#` prefix).
    fn parse_hex(hex: &str) -> Result<Self, ParseError> {
        match hex.len() {
            // #RGB: each nibble doubled
            3 => {
                let mut digits = hex.chars();
                let r = Self::hex_digit(&mut digits, hex)?;
                let g = Self::hex_digit(&mut digits, hex)?;
                let b = Self::hex_digit(&mut digits, hex)?;
                Ok(Color::Rgb(r * 17, g * 17, b * 17))
            }
            // #RRGGBB
            6 => {
                let mut digits = hex.chars();
                let r = Self::hex_pair(&mut digits, hex)?;
                let g = Self::hex_pair(&mut digits, hex)?;
                let b = Self::hex_pair(&mut digits, hex)?;
                Ok(Color::Rgb(r, g, b))
            }
            _ => Err(ParseError::InvalidColorToken(format!("#{hex}"))),
        }
    }

    fn hex_digit(digits: &mut std::str::Chars<'_>, token: &str) -> Result<u8, ParseError> {
        digits
            .next()
            .and_then(|c| c.to_digit(16))
            .map(|d| d as u8)
            .ok_or_else(|| ParseError::InvalidColorToken(format!("#{token}")))
    }

    fn hex_pair(digits: &mut std::str::Chars<'_>, token: &str) -> Result<u8, ParseError> {
        let high = Self::hex_digit(digits, token)?;
        let low = Self::hex_digit(digits, token)?;
        Ok(high * 16 + low)
    }

    /// Build a fully saturated color from an HSV hue in degrees.
    pub fn from_hue(hue: f64) -> Self {
        let h = hue.rem_euclid(360.0) / 60.0;
        let sector = h.floor() as u32 % 6;
        let f = h - h.floor();
        let rising = (f * 255.0).round() as u8;
        let falling = ((1.0 - f) * 255.0).round() as u8;
        let (r, g, b) = match sector {
            0 => (255, rising, 0),
            1 => (falling, 255, 0),
            2 => (0, 255, rising),
            3 => (0, falling, 255),
            4 => (rising, 0, 255),
            _ => (255, 0, falling),
        };
        Color::Rgb(r, g, b)
    }

    /// The RGB components this color renders as.
    ///
    /// `Reset` reports white, the rendering default.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Named(n) => n.rgb(),
            Color::Rgb(r, g, b) => (r, g, b),
            Color::Reset => (0xff, 0xff, 0xff),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for color in NamedColor::ALL {
            assert_eq!(NamedColor::from_code(color.code()), Some(color));
        }
        assert_eq!(NamedColor::from_code('B'), Some(NamedColor::Aqua));
        assert_eq!(NamedColor::from_code('z'), None);
    }

    #[test]
    fn name_round_trip() {
        for color in NamedColor::ALL {
            assert_eq!(NamedColor::from_name(color.name()), Some(color));
        }
        assert_eq!(NamedColor::from_name("GOLD"), Some(NamedColor::Gold));
        assert_eq!(NamedColor::from_name("grey"), Some(NamedColor::Gray));
        assert_eq!(NamedColor::from_name("mauve"), None);
    }

    #[test]
    fn parse_named() {
        assert_eq!(
            Color::parse("light_purple").unwrap(),
            Color::Named(NamedColor::LightPurple)
        );
        assert_eq!(Color::parse("reset").unwrap(), Color::Reset);
    }

    #[test]
    fn parse_hex_short() {
        assert_eq!(Color::parse("#f00").unwrap(), Color::Rgb(255, 0, 0));
        assert_eq!(Color::parse("#abc").unwrap(), Color::Rgb(170, 187, 204));
    }

    #[test]
    fn parse_hex_long() {
        assert_eq!(Color::parse("#ff5733").unwrap(), Color::Rgb(255, 87, 51));
        assert_eq!(Color::parse("#000000").unwrap(), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn parse_invalid() {
        assert!(Color::parse("notacolor").is_err());
        assert!(Color::parse("#gg0000").is_err());
        assert!(Color::parse("#ffff").is_err());
    }

    #[test]
    fn hue_primaries() {
        assert_eq!(Color::from_hue(0.0), Color::Rgb(255, 0, 0));
        assert_eq!(Color::from_hue(120.0), Color::Rgb(0, 255, 0));
        assert_eq!(Color::from_hue(240.0), Color::Rgb(0, 0, 255));
        assert_eq!(Color::from_hue(360.0), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn to_rgb() {
        assert_eq!(Color::Named(NamedColor::Gold).to_rgb(), (255, 170, 0));
        assert_eq!(Color::Rgb(1, 2, 3).to_rgb(), (1, 2, 3));
    }
}
