//! Timed transitions between two theme states.
//!
//! The driver repeatedly sends interpolated GRADIENT1 theme and
//! brightness commands until the transition duration elapses, pacing each
//! command kind to its own minimum wall-clock spacing. The final
//! iteration always carries the exact end values.

use std::time::Duration;

use tokio::time::Instant;

use crate::ble::Transport;
use crate::config::{BRIGHTNESS_COMMAND_INTERVAL, THEME_COMMAND_INTERVAL};
use crate::error::{Error, Result};
use crate::lamp::MoonsideLamp;
use crate::protocol::color::RgbColor;
use crate::protocol::theme::{ThemeConfig, ThemeName};

/// Theme used for animated transitions (two colors, no numeric).
const ANIMATION_THEME: ThemeName = ThemeName::Gradient1;

/// Interpolation curve: maps normalized progress in `0..=1` to eased
/// progress in `0..=1`. Inputs outside the range are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    /// Quadratic ease-in: slow start, accelerating toward the end.
    QuadIn,
    /// Quadratic ease-out: fast start, decelerating toward the end.
    QuadOut,
    /// Quadratic ease-in-out: slow start and end, fast middle.
    QuadInOut,
}

impl Easing {
    pub fn apply(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Endpoints and tuning for one animated transition.
#[derive(Debug, Clone)]
pub struct ThemeAnimation {
    pub duration: Duration,
    pub start_colors: Vec<RgbColor>,
    pub end_colors: Vec<RgbColor>,
    pub start_brightness: u8,
    pub end_brightness: u8,
    pub color_easing: Easing,
    pub brightness_easing: Easing,
    /// Minimum spacing between theme commands.
    pub theme_interval: Duration,
    /// Minimum spacing between brightness commands.
    pub brightness_interval: Duration,
}

impl ThemeAnimation {
    pub fn new(
        duration: Duration,
        start_colors: Vec<RgbColor>,
        end_colors: Vec<RgbColor>,
        start_brightness: u8,
        end_brightness: u8,
    ) -> Self {
        Self {
            duration,
            start_colors,
            end_colors,
            start_brightness,
            end_brightness,
            color_easing: Easing::default(),
            brightness_easing: Easing::default(),
            theme_interval: THEME_COMMAND_INTERVAL,
            brightness_interval: BRIGHTNESS_COMMAND_INTERVAL,
        }
    }

    pub fn color_easing(mut self, easing: Easing) -> Self {
        self.color_easing = easing;
        self
    }

    pub fn brightness_easing(mut self, easing: Easing) -> Self {
        self.brightness_easing = easing;
        self
    }
}

/// Drives `animation` on `lamp`.
///
/// Loops on a monotonic clock: computes `progress = elapsed / duration`
/// (capped at 1.0; a zero duration jumps straight to 1.0), interpolates
/// each color channel and the brightness through their easing curves, and
/// sends a theme command followed by a brightness command. Terminates
/// once progress reaches 1.0, so a zero-duration animation sends exactly
/// one theme and one brightness command carrying the end values.
pub async fn animate_theme<T: Transport>(
    lamp: &mut MoonsideLamp<T>,
    animation: &ThemeAnimation,
) -> Result<()> {
    if animation.start_colors.len() != animation.end_colors.len() {
        return Err(Error::ColorCountMismatch {
            start: animation.start_colors.len(),
            end: animation.end_colors.len(),
        });
    }

    let started = Instant::now();
    let mut last_theme: Option<Instant> = None;
    let mut last_brightness: Option<Instant> = None;

    loop {
        let progress = if animation.duration.is_zero() {
            1.0
        } else {
            (started.elapsed().as_secs_f32() / animation.duration.as_secs_f32()).min(1.0)
        };

        let eased = animation.color_easing.apply(progress);
        let colors: Vec<RgbColor> = animation
            .start_colors
            .iter()
            .zip(&animation.end_colors)
            .map(|(start, end)| lerp_color(*start, *end, eased))
            .collect();
        let brightness = lerp_channel(
            animation.start_brightness,
            animation.end_brightness,
            animation.brightness_easing.apply(progress),
        );

        pace(&mut last_theme, animation.theme_interval).await;
        lamp.set_theme(ThemeConfig::new(ANIMATION_THEME, colors)).await?;

        pace(&mut last_brightness, animation.brightness_interval).await;
        lamp.set_brightness(brightness).await?;

        if progress >= 1.0 {
            return Ok(());
        }
    }
}

/// Sleeps out whatever remains of `min_interval` since the previous send
/// of this kind, then stamps the current send.
async fn pace(last: &mut Option<Instant>, min_interval: Duration) {
    if let Some(previous) = *last {
        let elapsed = previous.elapsed();
        if elapsed < min_interval {
            tokio::time::sleep(min_interval - elapsed).await;
        }
    }
    *last = Some(Instant::now());
}

/// `start + eased * (end - start)`, truncated to an integer channel.
fn lerp_channel(start: u8, end: u8, eased: f32) -> u8 {
    (f32::from(start) + eased * (f32::from(end) - f32::from(start))) as u8
}

fn lerp_color(start: RgbColor, end: RgbColor, eased: f32) -> RgbColor {
    RgbColor::new(
        lerp_channel(start.r, end.r, eased),
        lerp_channel(start.g, end.g, eased),
        lerp_channel(start.b, end.b, eased),
    )
}
