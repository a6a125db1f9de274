//! RGB color value and its wire formats.

use std::fmt;
use std::str::FromStr;

/// An immutable RGB triplet. Each channel is 0..=255 by construction,
/// so padded wire output can never exceed three digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Comma-terminated decimal triplet, e.g. `RgbColor(255, 0, 255)`
    /// becomes `"255,0,255,"`. Used inside `THEME.` commands.
    pub fn to_comma_str(self) -> String {
        format!("{},{},{},", self.r, self.g, self.b)
    }

    /// Zero-padded 9-digit form, e.g. `"255000255"`. Used after the
    /// `COLOR` keyword in solid-color and pixel commands.
    pub fn to_padded_str(self) -> String {
        format!("{:03}{:03}{:03}", self.r, self.g, self.b)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Parses `"R,G,B"` (a trailing comma is tolerated). Used by the CLI.
impl FromStr for RgbColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut channels = s
            .trim()
            .trim_end_matches(',')
            .split(',')
            .map(|part| part.trim().parse::<u8>());

        let mut next = |name: &str| {
            channels
                .next()
                .ok_or_else(|| format!("missing {name} channel in '{s}'"))?
                .map_err(|e| format!("bad {name} channel in '{s}': {e}"))
        };

        let r = next("red")?;
        let g = next("green")?;
        let b = next("blue")?;
        if channels.next().is_some() {
            return Err(format!("too many channels in '{s}'"));
        }
        Ok(Self { r, g, b })
    }
}
