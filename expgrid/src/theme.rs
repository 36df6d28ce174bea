//! Theme tokens and per-row overrides. Presentation only.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::error::GridError;
use crate::error::Result;
use crate::model::RecordId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || GridError::InvalidColor(hex.to_string());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or_else(invalid)
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = GridError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

/// Theme tokens the grid reads when building row overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub stage_strong: Color,
    pub surface: Color,
    pub on_surface: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            stage_strong: Color::rgb(0xd9, 0xd9, 0xd9),
            surface: Color::rgb(0xff, 0xff, 0xff),
            on_surface: Color::rgb(0x26, 0x26, 0x26),
        }
    }
}

/// Record id → accent color, supplied by the host.
pub type ColorMap = HashMap<RecordId, Color>;

/// Overrides applied to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RowTheme {
    pub border_color: Option<Color>,
    pub accent_color: Option<Color>,
}
