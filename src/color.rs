//! Hex colors and shading
//!
//! Small helpers shared by the palette builder and the hosts:
//! - `#RRGGBB` / `#RGB` parsing (case-insensitive, `#` optional)
//! - lowercase `#rrggbb` formatting
//! - linear interpolation toward white or black

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    #[error("Malformed color '{0}': expected #RRGGBB or #RGB")]
    Malformed(String),
}

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// 8-bit RGB color with alpha, as handed to the hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let malformed = || ColorError::Malformed(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(malformed());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(malformed()),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| malformed())
        };

        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, a: u8) -> Rgba {
        Rgba { r: self.r, g: self.g, b: self.b, a }
    }

    pub fn opaque(self) -> Rgba {
        self.with_alpha(255)
    }

    /// Move every channel `percent`% of the way toward white (`percent >= 0`)
    /// or toward black (`percent < 0`).
    pub fn shade(&self, percent: i32) -> Self {
        let (target, amount) = if percent < 0 {
            (BLACK, -percent)
        } else {
            (WHITE, percent)
        };
        let t = amount.min(100) as f64 / 100.0;
        let mix = |c: u8, target: u8| {
            let c = c as f64;
            (c + (target as f64 - c) * t).round().clamp(0.0, 255.0) as u8
        };

        Self {
            r: mix(self.r, target.r),
            g: mix(self.g, target.g),
            b: mix(self.b, target.b),
        }
    }
}

impl Rgba {
    pub fn to_hex(&self) -> String {
        Rgb::new(self.r, self.g, self.b).to_hex()
    }

    /// Alpha as a fraction in [0, 1]
    pub fn opacity(&self) -> f64 {
        self.a as f64 / 255.0
    }
}
