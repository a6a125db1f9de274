//! BLE remote control for Moonside lamps.
//!
//! Moonside lamps expose a serial-like control surface over the Nordic
//! UART Service (NUS): ASCII command strings written to the NUS RX
//! characteristic drive power, brightness, solid colors, per-pixel
//! colors, and named animated themes. This crate discovers a lamp by its
//! advertised name, manages the connection lifecycle (including bounded
//! reconnect), encodes and validates commands, and can drive smooth
//! animated transitions between two theme states.
//!
//! ```no_run
//! use futures::FutureExt;
//! use moonside::{MoonsideLamp, RgbColor, ThemeConfig, ThemeName};
//!
//! #[tokio::main]
//! async fn main() -> moonside::Result<()> {
//!     let mut lamp = MoonsideLamp::new("MOONSIDE-S1").await?;
//!     lamp.session(|lamp| {
//!         async move {
//!             lamp.turn_on().await?;
//!             lamp.set_brightness(80).await?;
//!             lamp.set_theme(ThemeConfig::new(
//!                 ThemeName::Twinkle1,
//!                 vec![RgbColor::new(255, 0, 0), RgbColor::new(0, 0, 255)],
//!             ))
//!             .await
//!         }
//!         .boxed()
//!     })
//!     .await
//! }
//! ```

pub mod animation;
pub mod ble;
pub mod config;
mod error;
pub mod lamp;
pub mod protocol;

pub use animation::{animate_theme, Easing, ThemeAnimation};
pub use error::{Error, Result};
pub use lamp::{ConnectionState, MoonsideLamp};
pub use protocol::color::RgbColor;
pub use protocol::theme::{ThemeConfig, ThemeName, ThemeShape};
pub use protocol::Command;
