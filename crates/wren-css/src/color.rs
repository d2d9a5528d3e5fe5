//! Color values.
//!
//! Two entry points with different strictness:
//! - [`resolve_color`] accepts only the small named table and `#rgb` /
//!   `#rrggbb`, returning `None` for anything else;
//! - [`ColorValue::from_str`] accepts more forms (`#rgba`, `#rrggbbaa`,
//!   `rgb()`/`rgba()`) and reports why a literal is invalid.

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;
use wren_common::warning::warn_once;

/// Error returned when a color literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Nothing but whitespace.
    #[error("empty color value")]
    Empty,
    /// A `#` form with the wrong length or non-hex digits.
    #[error("invalid hex color '{0}'")]
    InvalidHex(String),
    /// An `rgb()`/`rgba()` call with bad arguments.
    #[error("invalid color function '{0}'")]
    InvalidFunction(String),
    /// A word that is not in the named-color table.
    #[error("unknown color name '{0}'")]
    UnknownName(String),
}

/// The named colors understood everywhere in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[allow(missing_docs)]
pub enum NamedColor {
    Red,
    Green,
    Blue,
    Gray,
    Orange,
    White,
    Black,
}

impl NamedColor {
    /// The color this name stands for.
    #[must_use]
    pub const fn value(self) -> ColorValue {
        let (r, g, b) = match self {
            Self::Red => (255, 0, 0),
            Self::Green => (0, 128, 0),
            Self::Blue => (0, 0, 255),
            Self::Gray => (128, 128, 128),
            Self::Orange => (255, 165, 0),
            Self::White => (255, 255, 255),
            Self::Black => (0, 0, 0),
        };
        ColorValue::rgb(r, g, b)
    }
}

/// sRGB color as RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorValue {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
    /// Alpha channel (0-255, 255 = fully opaque).
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    /// Short forms double each digit.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            3 | 4 => {
                let doubled = |i: usize| digit(i).map(|d| d * 17);
                let a = if hex.len() == 4 { doubled(3)? } else { 255 };
                Some(Self {
                    r: doubled(0)?,
                    g: doubled(1)?,
                    b: doubled(2)?,
                    a,
                })
            }
            6 | 8 => {
                let a = if hex.len() == 8 { pair(6)? } else { 255 };
                Some(Self {
                    r: pair(0)?,
                    g: pair(2)?,
                    b: pair(4)?,
                    a,
                })
            }
            _ => None,
        }
    }

    /// Look up a name in the named-color table (case-insensitive).
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        NamedColor::from_str(name).ok().map(NamedColor::value)
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    #[must_use]
    pub fn to_hex_string(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// One `rgb()` argument: an integer 0-255 or a percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_channel(arg: &str) -> Option<u8> {
    if let Some(percent) = arg.strip_suffix('%') {
        let p: f32 = percent.trim().parse().ok()?;
        return Some((p.clamp(0.0, 100.0) * 2.55).round() as u8);
    }
    let v: f32 = arg.parse().ok()?;
    Some(v.clamp(0.0, 255.0).round() as u8)
}

/// Alpha as a 0-1 number or a percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_alpha(arg: &str) -> Option<u8> {
    let fraction = match arg.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f32>().ok()? / 100.0,
        None => arg.parse::<f32>().ok()?,
    };
    Some((fraction.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// `rgb(r, g, b)` / `rgba(r, g, b, a)`, comma- or space-separated, with an
/// optional `/ alpha`.
fn parse_rgb_function(text: &str) -> Option<ColorValue> {
    let lower = text.to_ascii_lowercase();
    let inner = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    let args: Vec<&str> = inner
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|a| !a.is_empty())
        .collect();
    match args.as_slice() {
        [r, g, b] => Some(ColorValue::rgb(
            parse_channel(r)?,
            parse_channel(g)?,
            parse_channel(b)?,
        )),
        [r, g, b, a] => Some(ColorValue {
            r: parse_channel(r)?,
            g: parse_channel(g)?,
            b: parse_channel(b)?,
            a: parse_alpha(a)?,
        }),
        _ => None,
    }
}

impl FromStr for ColorValue {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if s.starts_with('#') {
            return Self::from_hex(s).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()));
        }
        if s.contains('(') {
            return parse_rgb_function(s)
                .ok_or_else(|| ColorParseError::InvalidFunction(s.to_string()));
        }
        Self::from_named(s).ok_or_else(|| ColorParseError::UnknownName(s.to_string()))
    }
}

/// Resolve a color token to canonical `#rrggbb`.
///
/// Only the named table and 3- or 6-digit hex forms are recognized; anything
/// else yields `None`.
#[must_use]
pub fn resolve_color(token: &str) -> Option<String> {
    let token = token.trim();
    let resolved = match token.strip_prefix('#') {
        Some(hex) if matches!(hex.len(), 3 | 6) => ColorValue::from_hex(hex),
        Some(_) => None,
        None => ColorValue::from_named(token),
    };
    if resolved.is_none() && !token.is_empty() {
        warn_once("CSS", &format!("unrecognized color '{token}'"));
    }
    resolved.map(|c| c.to_hex_string())
}
