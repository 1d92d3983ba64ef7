//! Core types for spark-board.
//!
//! Colors (parse, mix, hex output), cell coordinates and the global cursor
//! mode.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Integers for exact comparison, no floating point epsilon needed.
/// Alpha 255 = fully opaque, 0 = fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Transparent color.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    // Standard colors
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);

    /// Create from 0xRRGGBB integer format.
    ///
    /// ```
    /// use spark_board::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_rgb_int(0xf0f0f0), Rgba::rgb(240, 240, 240));
    /// ```
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Check if color is fully opaque.
    #[inline]
    pub const fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Mix two colors half and half, alpha included.
    ///
    /// Channels round up on .5 so mixing is symmetric: `mix(a, b) == mix(b, a)`.
    ///
    /// ```
    /// use spark_board::types::Rgba;
    ///
    /// let pink = Rgba::mix(Rgba::WHITE, Rgba::RED);
    /// assert_eq!(pink, Rgba::rgb(255, 128, 128));
    /// ```
    #[inline]
    pub fn mix(a: Self, b: Self) -> Self {
        fn half(x: u8, y: u8) -> u8 {
            ((u16::from(x) + u16::from(y) + 1) / 2) as u8
        }
        Self {
            r: half(a.r, b.r),
            g: half(a.g, b.g),
            b: half(a.b, b.b),
            a: half(a.a, b.a),
        }
    }

    // =========================================================================
    // Color Parsing
    // =========================================================================

    /// Parse hex color string (#RGB, #RRGGBB, #RRGGBBAA). The `#` is optional.
    ///
    /// ```
    /// use spark_board::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("#F0F0F0"), Some(Rgba::rgb(240, 240, 240)));
    /// assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
    /// assert_eq!(Rgba::from_hex("#ff000080"), Some(Rgba::new(255, 0, 0, 128)));
    /// assert!(Rgba::from_hex("#gg0000").is_none());
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            Some((hex_digit(s[i])? << 4) | hex_digit(s[i + 1])?)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
            }
            6 => Some(Self::rgb(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
            )),
            8 => Some(Self::new(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
                hex_byte(bytes, 6)?,
            )),
            _ => None,
        }
    }

    /// Look up a basic named color ("white", "red", ...). Case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.trim().to_ascii_lowercase().as_str() {
            "transparent" => Self::TRANSPARENT,
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" | "lime" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "cyan" | "aqua" => Self::CYAN,
            "magenta" | "fuchsia" => Self::MAGENTA,
            "gray" | "grey" => Self::GRAY,
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "brown" => Self::rgb(165, 42, 42),
            "pink" => Self::rgb(255, 192, 203),
            _ => return None,
        };
        Some(color)
    }

    /// Parse any supported color spec: hex (`#RGB`, `#RRGGBB`, `#RRGGBBAA`)
    /// or a named color.
    ///
    /// ```
    /// use spark_board::types::Rgba;
    ///
    /// assert_eq!(Rgba::parse("#00FF00").unwrap(), Rgba::GREEN);
    /// assert_eq!(Rgba::parse("White").unwrap(), Rgba::WHITE);
    /// assert!(Rgba::parse("not-a-color").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        let parsed = if trimmed.starts_with('#') {
            Self::from_hex(trimmed)
        } else {
            Self::from_name(trimmed).or_else(|| Self::from_hex(trimmed))
        };
        parsed.ok_or_else(|| ColorError::Invalid(input.to_string()))
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Rgba {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

// =============================================================================
// Coordinates
// =============================================================================

/// Integer position of a cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Textual key, `"x,y"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl From<(u16, u16)> for Coord {
    fn from((x, y): (u16, u16)) -> Self {
        Self::new(x, y)
    }
}

// =============================================================================
// Cursor Mode
// =============================================================================

/// Global interaction mode deciding how pointer events are read.
///
/// Owned by the board state; cells only ever read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorMode {
    #[default]
    Default,
    Painting,
}

impl CursorMode {
    /// The other mode. Both modes are reachable from each other.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Default => Self::Painting,
            Self::Painting => Self::Default,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
