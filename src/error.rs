//! Unified error type for the moonside crate.
//!
//! Protocol validation errors (range / theme shape) are raised before any
//! bytes are transmitted; connection-lifecycle errors carry enough context
//! for the caller to decide whether to retry.

use thiserror::Error;
use uuid::Uuid;

use crate::protocol::theme::ThemeName;

/// Top-level error type used across the crate.
#[derive(Debug, Error)]
pub enum Error {
    // Connection lifecycle
    /// No Bluetooth adapter is available on this host.
    #[error("no Bluetooth adapter available")]
    NoAdapter,

    /// The scan window closed without seeing the advertised device name.
    #[error("device '{0}' not found during scan")]
    DeviceNotFound(String),

    /// The connected device does not expose the expected characteristic.
    #[error("characteristic {0} not found on device")]
    CharacteristicNotFound(Uuid),

    /// Every reconnect attempt failed.
    #[error("failed to reconnect after {0} attempt(s)")]
    ReconnectExhausted(u32),

    /// A send was attempted without a live connection.
    #[error("not connected to the lamp")]
    NotConnected,

    // Protocol validation
    /// Brightness outside the firmware's accepted 0..=120 range.
    #[error("brightness {0} out of range (0..=120)")]
    BrightnessOutOfRange(u8),

    /// Color count does not match the theme's required shape.
    #[error("theme {theme} requires {expected} color(s), got {actual}")]
    ThemeShapeMismatch {
        theme: ThemeName,
        expected: usize,
        actual: usize,
    },

    /// The theme requires a numeric parameter and none was given.
    #[error("theme {0} requires a numeric parameter")]
    MissingThemeParameter(ThemeName),

    /// The theme does not accept a numeric parameter but one was given.
    #[error("theme {0} does not accept a numeric parameter")]
    UnexpectedThemeParameter(ThemeName),

    // Animation
    /// Animation endpoints must carry the same number of colors.
    #[error("animation endpoints differ in color count ({start} vs {end})")]
    ColorCountMismatch { start: usize, end: usize },

    // Transport
    /// Error surfaced by the BLE stack.
    #[error(transparent)]
    Ble(#[from] btleplug::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
