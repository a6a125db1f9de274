//! Crate-wide constants and default tunables.
//!
//! All protocol UUIDs, timing parameters, and firmware limits live here
//! so they can be tuned in one place.

use std::time::Duration;
use uuid::Uuid;

// Nordic UART Service (NUS)

/// NUS service UUID: 6E400001-B5A3-F393-E0A9-E50E24DCCA9E.
pub const NUS_SERVICE_UUID: Uuid = Uuid::from_u128(0x6e400001_b5a3_f393_e0a9_e50e24dcca9e);

/// NUS RX characteristic UUID (client → device, Write):
/// 6E400002-B5A3-F393-E0A9-E50E24DCCA9E.
///
/// This is the write target for every lamp command.
pub const NUS_RX_CHAR_UUID: Uuid = Uuid::from_u128(0x6e400002_b5a3_f393_e0a9_e50e24dcca9e);

// Discovery

/// Duration of a BLE scan window.
pub const SCAN_WINDOW: Duration = Duration::from_secs(8);

/// Interval between peripheral-list polls while scanning.
pub const SCAN_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Reconnect attempts made by `ensure_connected` before giving up.
/// Zero disables the reconnect path entirely.
pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 3;

// Firmware limits

/// Highest brightness the lamp firmware accepts (`BRIGH000`..`BRIGH120`).
pub const BRIGHTNESS_MAX: u8 = 120;

// Animation cadence

/// Minimum spacing between successive color-bearing theme commands.
pub const THEME_COMMAND_INTERVAL: Duration = Duration::from_millis(150);

/// Minimum spacing between successive brightness commands.
pub const BRIGHTNESS_COMMAND_INTERVAL: Duration = Duration::from_millis(10);
