//! Color type shared by classification and SVG output.

use std::{fmt, str::FromStr};

use anyhow::{Result, anyhow, ensure};
use serde::{Deserialize, Serialize};

/// Simple RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self { Self { r, g, b } }

    /// Linear interpolation in RGB space, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            (a as f64 + (b as f64 - a as f64) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgb { r: mix(self.r, other.r), g: mix(self.g, other.g), b: mix(self.b, other.b) }
    }
}

impl fmt::Display for Rgb {
    /// Format as CSS hex: #rrggbb
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = anyhow::Error;

    /// Parse `#rgb` or `#rrggbb` (case-insensitive).
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().strip_prefix('#')
            .ok_or_else(|| anyhow!("[common::color] expected '#' prefix in {s:?}"))?;
        ensure!(hex.chars().all(|c| c.is_ascii_hexdigit()), "[common::color] invalid hex digits in {s:?}");

        let channel = |digits: &str| u8::from_str_radix(digits, 16)
            .map_err(|e| anyhow!("[common::color] bad channel in {s:?}: {e}"));

        match hex.len() {
            3 => {
                let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
                Ok(Rgb { r: short(0)?, g: short(1)?, b: short(2)? })
            }
            6 => Ok(Rgb { r: channel(&hex[0..2])?, g: channel(&hex[2..4])?, b: channel(&hex[4..6])? }),
            n => Err(anyhow!("[common::color] expected 3 or 6 hex digits in {s:?}, found {n}")),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = anyhow::Error;
    fn try_from(value: String) -> Result<Self> { value.parse() }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self { value.to_string() }
}
