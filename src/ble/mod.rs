//! Bluetooth Low Energy transport seam.
//!
//! The lamp client only needs four things from the platform BLE stack:
//! scan for advertising devices, connect to an address, enumerate
//! characteristics, and write bytes to one of them. Those live behind the
//! [`Transport`] / [`Link`] trait pair so the connection-lifecycle logic
//! can be exercised on the host against a mock; [`btle::BtleTransport`]
//! is the real implementation over btleplug.

pub mod btle;

use std::time::Duration;

use uuid::Uuid;

use crate::error::Result;

/// A device seen during a scan window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDevice {
    /// Advertised local name, if the advertisement carried one.
    pub name: Option<String>,
    /// Platform address/identifier, opaque to callers. Feed it back to
    /// [`Transport::connect`] unchanged.
    pub address: String,
}

/// Platform BLE stack: discovery and connection establishment.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Link: Link;

    /// Scans for `window`, returning every advertising device seen.
    async fn scan(&self, window: Duration) -> Result<Vec<DiscoveredDevice>>;

    /// Opens a connection to a previously discovered address and performs
    /// service discovery on it.
    async fn connect(&self, address: &str) -> Result<Self::Link>;
}

/// A live connection to one device.
#[allow(async_fn_in_trait)]
pub trait Link {
    /// UUIDs of every characteristic exposed by the device.
    fn characteristics(&self) -> Vec<Uuid>;

    /// Whether the transport still considers this link alive.
    async fn is_connected(&self) -> bool;

    /// Writes `payload` to the given characteristic. With `confirm` the
    /// write awaits transport acknowledgment.
    async fn write(&self, characteristic: Uuid, payload: &[u8], confirm: bool) -> Result<()>;

    /// Closes the connection.
    async fn disconnect(&self) -> Result<()>;
}
