//! Per-request presentation parameters handed to the renderer.

use std::{fmt, str::FromStr};

use crate::error::{ModelError, Result};

/// Smallest raster edge requested from the renderer.
pub const MIN_DIMENSION: f32 = 32.0;

/// Layout box an icon is drawn into, in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutRect {
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Integer raster size, each edge floored at [`MIN_DIMENSION`].
    ///
    /// NaN and negative edges collapse to the minimum.
    pub fn raster_size(&self) -> (u32, u32) {
        (clamp_dimension(self.width), clamp_dimension(self.height))
    }
}

fn clamp_dimension(value: f32) -> u32 {
    // f32::max returns the non-NaN operand.
    value.max(MIN_DIMENSION).round() as u32
}

/// RGBA tint applied to tintable icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TintColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TintColor {
    pub const WHITE: TintColor = TintColor::rgb(0xff, 0xff, 0xff);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn hex(&self) -> String {
        if self.a == 0xff {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`; the `#` is optional.
    pub fn parse_hex(value: &str) -> Result<Self> {
        let invalid = || ModelError::InvalidColor(value.to_string());
        let digits = value.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        match digits.len() {
            3 => {
                let short = |idx: usize| {
                    u8::from_str_radix(&digits[idx..idx + 1], 16)
                        .map(|v| v * 0x11)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb(short(0)?, short(1)?, short(2)?))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::rgba(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for TintColor {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for TintColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

/// Cache-relative path plus query-style render parameters, e.g.
/// `mdi/home.t.svg?color=#ffffff&w=32&h=32`.
///
/// This string is the whole contract with the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AccessPath(String);

impl AccessPath {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file part, without render parameters.
    pub fn file_path(&self) -> &str {
        self.0.split_once('?').map_or(&self.0, |(file, _)| file)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for AccessPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
