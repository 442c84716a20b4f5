//! RGB color values and color name resolution
//!
//! Colors are named by testing a fixed, ordered list of RGB range boxes.
//! The boxes overlap, so the order of [`NAMED_RANGES`] decides the result:
//! the first box containing the color wins.
//!
//! # Example
//!
//! ```rust
//! use lokafit::color::{resolve_name, ColorName, RgbColor};
//!
//! assert_eq!(resolve_name(200, 30, 30), ColorName::Red);
//! assert_eq!(RgbColor::new(255, 0, 0).to_hex(), "#FF0000");
//! ```

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================
// Error Types
// ============================================================

/// Hex color parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexParseError {
    #[error("Invalid hex color length: expected 6 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("Invalid hex digit in color: {0}")]
    InvalidDigit(String),
}

// ============================================================
// Data Structures
// ============================================================

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Format as uppercase `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Result<Self, HexParseError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(HexParseError::InvalidLength(digits.len()));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(HexParseError::InvalidDigit(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| HexParseError::InvalidDigit(hex.to_string()))
        };

        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Resolve a human-readable name for this color
    pub fn name(&self) -> ColorName {
        resolve_name(self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = HexParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Names a color can resolve to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ColorName {
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    White,
    Gray,
    Unknown,
}

impl ColorName {
    pub fn as_str(self) -> &'static str {
        match self {
            ColorName::Red => "Red",
            ColorName::Blue => "Blue",
            ColorName::Green => "Green",
            ColorName::Yellow => "Yellow",
            ColorName::Black => "Black",
            ColorName::White => "White",
            ColorName::Gray => "Gray",
            ColorName::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named RGB box with inclusive per-channel bounds
#[derive(Debug, Clone, Copy)]
pub struct NamedRange {
    pub name: ColorName,
    pub r: (u8, u8),
    pub g: (u8, u8),
    pub b: (u8, u8),
}

impl NamedRange {
    const fn new(name: ColorName, r: (u8, u8), g: (u8, u8), b: (u8, u8)) -> Self {
        Self { name, r, g, b }
    }

    /// Check whether all three channels fall inside the box
    pub fn contains(&self, r: u8, g: u8, b: u8) -> bool {
        (self.r.0..=self.r.1).contains(&r)
            && (self.g.0..=self.g.1).contains(&g)
            && (self.b.0..=self.b.1).contains(&b)
    }
}

/// Named ranges in priority order. Ranges overlap; the first match wins.
pub const NAMED_RANGES: [NamedRange; 7] = [
    NamedRange::new(ColorName::Red, (100, 255), (0, 100), (0, 100)),
    NamedRange::new(ColorName::Blue, (0, 100), (0, 150), (100, 255)),
    NamedRange::new(ColorName::Green, (0, 100), (100, 255), (0, 100)),
    NamedRange::new(ColorName::Yellow, (100, 255), (100, 255), (0, 100)),
    NamedRange::new(ColorName::Black, (0, 50), (0, 50), (0, 50)),
    NamedRange::new(ColorName::White, (150, 255), (150, 255), (150, 255)),
    NamedRange::new(ColorName::Gray, (50, 150), (50, 150), (50, 150)),
];

/// Resolve the name of an RGB color, falling back to [`ColorName::Unknown`]
pub fn resolve_name(r: u8, g: u8, b: u8) -> ColorName {
    NAMED_RANGES
        .iter()
        .find(|range| range.contains(r, g, b))
        .map(|range| range.name)
        .unwrap_or(ColorName::Unknown)
}

/// Luminance (ITU-R BT.601)
pub(crate) fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64).round() as u8
}

// ============================================================
// Tests
// ============================================================
