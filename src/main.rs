//! Demo CLI: drive a Moonside lamp from the command line.
//!
//! Every invocation opens a managed session (connect, run the command,
//! disconnect). Point `--device` at the lamp's advertised BLE name; run
//! the binary twice with different names to drive two lamps.

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use futures::FutureExt;
use moonside::ble::Transport;
use moonside::{
    animate_theme, Easing, MoonsideLamp, RgbColor, ThemeAnimation, ThemeConfig, ThemeName,
};

#[derive(Parser)]
#[command(name = "moonside", about = "Control a Moonside lamp over BLE")]
struct Cli {
    /// Advertised BLE name of the lamp.
    #[arg(long, default_value = "MOONSIDE-S1")]
    device: String,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Turn the lamp on.
    On,
    /// Turn the lamp off.
    Off,
    /// Set overall brightness (0-120).
    Brightness { level: u8 },
    /// Set a solid color, e.g. `color 255,0,255 --brightness 60`.
    Color {
        color: RgbColor,
        #[arg(long)]
        brightness: Option<u8>,
    },
    /// Apply a named theme with its colors, e.g.
    /// `theme twinkle1 255,0,0 0,0,255`.
    Theme {
        name: ThemeName,
        colors: Vec<RgbColor>,
    },
    /// Set a single pixel and apply pixel mode.
    Pixel {
        pixel_id: u16,
        brightness: u8,
        color: RgbColor,
    },
    /// Animate a gradient between two color pairs.
    Animate {
        /// Two start colors, e.g. `--from 255,0,0 --from 0,0,255`.
        #[arg(long = "from", required = true)]
        from_colors: Vec<RgbColor>,
        /// Two end colors.
        #[arg(long = "to", required = true)]
        to_colors: Vec<RgbColor>,
        #[arg(long, default_value_t = 60)]
        from_brightness: u8,
        #[arg(long, default_value_t = 60)]
        to_brightness: u8,
        /// Transition duration in seconds.
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
        /// Easing curve: linear, quad-in, quad-out, quad-in-out.
        #[arg(long, default_value = "linear", value_parser = parse_easing)]
        easing: Easing,
    },
}

fn parse_easing(s: &str) -> Result<Easing, String> {
    match s {
        "linear" => Ok(Easing::Linear),
        "quad-in" => Ok(Easing::QuadIn),
        "quad-out" => Ok(Easing::QuadOut),
        "quad-in-out" => Ok(Easing::QuadInOut),
        other => Err(format!("unknown easing '{other}'")),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut lamp = MoonsideLamp::new(&cli.device).await?;

    let command = cli.command;
    lamp.session(move |lamp| async move { run(lamp, command).await }.boxed())
        .await?;
    Ok(())
}

async fn run<T: Transport>(lamp: &mut MoonsideLamp<T>, command: Cmd) -> moonside::Result<()> {
    match command {
        Cmd::On => lamp.turn_on().await,
        Cmd::Off => lamp.turn_off().await,
        Cmd::Brightness { level } => lamp.set_brightness(level).await,
        Cmd::Color { color, brightness } => lamp.set_color(color, brightness).await,
        Cmd::Theme { name, colors } => lamp.set_theme(ThemeConfig::new(name, colors)).await,
        Cmd::Pixel {
            pixel_id,
            brightness,
            color,
        } => {
            lamp.set_pixel(pixel_id, brightness, color).await?;
            lamp.apply_pixel_mode().await
        }
        Cmd::Animate {
            from_colors,
            to_colors,
            from_brightness,
            to_brightness,
            seconds,
            easing,
        } => {
            let animation = ThemeAnimation::new(
                Duration::from_secs_f32(seconds),
                from_colors,
                to_colors,
                from_brightness,
                to_brightness,
            )
            .color_easing(easing)
            .brightness_easing(easing);
            animate_theme(lamp, &animation).await
        }
    }
}
