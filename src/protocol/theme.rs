//! Theme catalog and validated theme configuration.
//!
//! The lamp firmware ships a fixed set of animated themes, each taking a
//! fixed number of colors and at most one numeric parameter. The catalog
//! is a closed enum so an unknown theme cannot be represented at all, and
//! a total `match` supplies each theme's shape.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::protocol::color::RgbColor;

/// Every theme identifier the lamp firmware understands. `as_str` yields
/// the exact uppercase token expected on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeName {
    Theme1,
    Theme2,
    Theme3,
    Theme4,
    Theme5,
    Gradient1,
    Gradient2,
    Pulsing1,
    Twinkle1,
    Wave1,
    Beat1,
    Beat2,
    Beat3,
    Colordrop1,
    Lava1,
    Fire2,
    Palette2,
}

/// Parameter shape of a theme: how many colors it takes and whether a
/// numeric parameter (speed, intensity, ...) is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeShape {
    pub color_count: usize,
    pub has_numeric: bool,
}

impl ThemeShape {
    const fn colors(color_count: usize) -> Self {
        Self {
            color_count,
            has_numeric: false,
        }
    }
}

impl ThemeName {
    /// The firmware token for this theme.
    pub const fn as_str(self) -> &'static str {
        match self {
            ThemeName::Theme1 => "THEME1",
            ThemeName::Theme2 => "THEME2",
            ThemeName::Theme3 => "THEME3",
            ThemeName::Theme4 => "THEME4",
            ThemeName::Theme5 => "THEME5",
            ThemeName::Gradient1 => "GRADIENT1",
            ThemeName::Gradient2 => "GRADIENT2",
            ThemeName::Pulsing1 => "PULSING1",
            ThemeName::Twinkle1 => "TWINKLE1",
            ThemeName::Wave1 => "WAVE1",
            ThemeName::Beat1 => "BEAT1",
            ThemeName::Beat2 => "BEAT2",
            ThemeName::Beat3 => "BEAT3",
            ThemeName::Colordrop1 => "COLORDROP1",
            ThemeName::Lava1 => "LAVA1",
            ThemeName::Fire2 => "FIRE2",
            ThemeName::Palette2 => "PALETTE2",
        }
    }

    /// Required parameter shape. Total over the enum, so a cataloged
    /// theme can never be missing its entry.
    pub const fn shape(self) -> ThemeShape {
        match self {
            ThemeName::Palette2 => ThemeShape::colors(6),
            ThemeName::Theme3 => ThemeShape::colors(6),
            ThemeName::Fire2 => ThemeShape::colors(4),
            ThemeName::Gradient2 => ThemeShape::colors(3),
            ThemeName::Beat1 => ThemeShape::colors(3),
            ThemeName::Beat3 => ThemeShape::colors(3),
            ThemeName::Theme1
            | ThemeName::Theme2
            | ThemeName::Theme4
            | ThemeName::Theme5
            | ThemeName::Gradient1
            | ThemeName::Pulsing1
            | ThemeName::Twinkle1
            | ThemeName::Wave1
            | ThemeName::Beat2
            | ThemeName::Colordrop1
            | ThemeName::Lava1 => ThemeShape::colors(2),
        }
    }

    /// All cataloged themes, in firmware order.
    pub const ALL: [ThemeName; 17] = [
        ThemeName::Theme1,
        ThemeName::Theme2,
        ThemeName::Theme3,
        ThemeName::Theme4,
        ThemeName::Theme5,
        ThemeName::Gradient1,
        ThemeName::Gradient2,
        ThemeName::Pulsing1,
        ThemeName::Twinkle1,
        ThemeName::Wave1,
        ThemeName::Beat1,
        ThemeName::Beat2,
        ThemeName::Beat3,
        ThemeName::Colordrop1,
        ThemeName::Lava1,
        ThemeName::Fire2,
        ThemeName::Palette2,
    ];
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive lookup by firmware token. Used by the CLI.
impl FromStr for ThemeName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_uppercase();
        ThemeName::ALL
            .into_iter()
            .find(|name| name.as_str() == token)
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// A theme plus its parameters, validated lazily when serialized.
///
/// ```
/// use moonside::{RgbColor, ThemeConfig, ThemeName};
///
/// let config = ThemeConfig::new(
///     ThemeName::Twinkle1,
///     vec![RgbColor::new(255, 0, 0), RgbColor::new(0, 0, 255)],
/// );
/// assert_eq!(
///     config.to_command_string().unwrap(),
///     "THEME.TWINKLE1.255,0,0,0,0,255,",
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ThemeConfig {
    pub name: ThemeName,
    pub numeric_param: Option<u32>,
    pub colors: Vec<RgbColor>,
}

impl ThemeConfig {
    pub fn new(name: ThemeName, colors: Vec<RgbColor>) -> Self {
        Self {
            name,
            numeric_param: None,
            colors,
        }
    }

    pub fn with_numeric_param(mut self, value: u32) -> Self {
        self.numeric_param = Some(value);
        self
    }

    /// Checks color count and numeric-parameter presence against the
    /// theme's shape. Runs before serialization so no partial command
    /// string is ever produced.
    pub fn validate(&self) -> Result<()> {
        let shape = self.name.shape();

        if self.colors.len() != shape.color_count {
            return Err(Error::ThemeShapeMismatch {
                theme: self.name,
                expected: shape.color_count,
                actual: self.colors.len(),
            });
        }

        if shape.has_numeric && self.numeric_param.is_none() {
            return Err(Error::MissingThemeParameter(self.name));
        }
        if !shape.has_numeric && self.numeric_param.is_some() {
            return Err(Error::UnexpectedThemeParameter(self.name));
        }

        Ok(())
    }

    /// Builds the wire command, e.g. `THEME.TWINKLE1.255,0,0,0,0,255,`.
    ///
    /// Format: `THEME.<name>.` + optional unpadded numeric parameter +
    /// each color as a comma-terminated triplet. The result always ends
    /// with exactly one comma.
    pub fn to_command_string(&self) -> Result<String> {
        self.validate()?;

        let mut params = String::new();
        if let Some(value) = self.numeric_param {
            // Infallible for String targets.
            let _ = write!(params, "{value}");
        }
        for color in &self.colors {
            params.push_str(&color.to_comma_str());
        }
        // Color triplets already end in a comma; this only fires for a
        // bare numeric parameter (or an empty shape).
        if !params.ends_with(',') {
            params.push(',');
        }

        Ok(format!("THEME.{}.{}", self.name.as_str(), params))
    }
}
