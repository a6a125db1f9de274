//! ASCII command protocol spoken over the NUS RX characteristic.
//!
//! One command per write, each write confirmed:
//!
//! | Command          | Format                                  |
//! |------------------|-----------------------------------------|
//! | Power on / off   | `LEDON` / `LEDOFF`                      |
//! | Brightness       | `BRIGH###` (0..=120, zero-padded)       |
//! | Solid color      | `COLORrrrgggbbb[ bbb]`                  |
//! | Pixel            | `PIXEL,<id>,<brightness> COLORrrrgggbbb`|
//! | Apply pixel mode | `MODEPIXEL`                             |
//! | Theme            | `THEME.<NAME>.[param]r,g,b,...,`        |

pub mod color;
pub mod theme;

use crate::config::BRIGHTNESS_MAX;
use crate::error::{Error, Result};
use color::RgbColor;
use theme::ThemeConfig;

/// A single lamp command. `encode` validates parameters and produces the
/// exact ASCII string the firmware expects; nothing is transmitted until
/// validation passes.
#[derive(Debug, Clone)]
pub enum Command {
    PowerOn,
    PowerOff,
    Brightness(u8),
    Color {
        color: RgbColor,
        brightness: Option<u8>,
    },
    Pixel {
        pixel_id: u16,
        brightness: u8,
        color: RgbColor,
    },
    ApplyPixelMode,
    Theme(ThemeConfig),
}

impl Command {
    /// Builds the wire string for this command.
    pub fn encode(&self) -> Result<String> {
        match self {
            Command::PowerOn => Ok("LEDON".to_owned()),
            Command::PowerOff => Ok("LEDOFF".to_owned()),
            Command::Brightness(level) => {
                let level = check_brightness(*level)?;
                Ok(format!("BRIGH{level:03}"))
            }
            Command::Color { color, brightness } => {
                let mut cmd = format!("COLOR{}", color.to_padded_str());
                if let Some(level) = brightness {
                    // Same range check as the standalone brightness command.
                    let level = check_brightness(*level)?;
                    cmd.push(' ');
                    cmd.push_str(&level.to_string());
                }
                Ok(cmd)
            }
            Command::Pixel {
                pixel_id,
                brightness,
                color,
            } => {
                let brightness = check_brightness(*brightness)?;
                Ok(format!(
                    "PIXEL,{pixel_id},{brightness} COLOR{}",
                    color.to_padded_str()
                ))
            }
            Command::ApplyPixelMode => Ok("MODEPIXEL".to_owned()),
            Command::Theme(config) => config.to_command_string(),
        }
    }
}

fn check_brightness(value: u8) -> Result<u8> {
    if value > BRIGHTNESS_MAX {
        return Err(Error::BrightnessOutOfRange(value));
    }
    Ok(value)
}
