//! btleplug-backed [`Transport`] implementation.
//!
//! Uses the first Bluetooth adapter on the host. Scanning polls the
//! adapter's peripheral list at a fixed interval for the duration of the
//! window; btleplug keeps accumulating advertisements in the background.

use std::time::Duration;

use btleplug::api::{Central, Manager as _, Peripheral as _, ScanFilter, WriteType};
use btleplug::platform::{Adapter, Manager, Peripheral};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ble::{DiscoveredDevice, Link, Transport};
use crate::config::SCAN_POLL_INTERVAL;
use crate::error::{Error, Result};

/// Host BLE transport over the platform's first adapter.
pub struct BtleTransport {
    adapter: Adapter,
}

impl BtleTransport {
    /// Grabs the default Bluetooth adapter.
    pub async fn new() -> Result<Self> {
        let manager = Manager::new().await?;
        let adapter = manager
            .adapters()
            .await?
            .into_iter()
            .next()
            .ok_or(Error::NoAdapter)?;
        debug!("using default Bluetooth adapter");
        Ok(Self { adapter })
    }
}

impl Transport for BtleTransport {
    type Link = BtleLink;

    async fn scan(&self, window: Duration) -> Result<Vec<DiscoveredDevice>> {
        info!(window_secs = window.as_secs(), "BLE scan starting");
        self.adapter.start_scan(ScanFilter::default()).await?;

        let deadline = tokio::time::Instant::now() + window;
        let mut found: Vec<DiscoveredDevice> = Vec::new();

        loop {
            for peripheral in self.adapter.peripherals().await? {
                let address = peripheral.id().to_string();
                if !wants_name(&found, &address) {
                    continue;
                }
                // The local name often arrives in a later scan response, so
                // keep re-reading properties until one shows up.
                let name = match peripheral.properties().await {
                    Ok(Some(props)) => props.local_name,
                    _ => None,
                };
                if let Some(name) = &name {
                    debug!(%address, %name, "found device");
                }
                record_sighting(&mut found, address, name);
            }

            if tokio::time::Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(SCAN_POLL_INTERVAL).await;
        }

        self.adapter.stop_scan().await?;
        info!(count = found.len(), "BLE scan complete");
        Ok(found)
    }

    async fn connect(&self, address: &str) -> Result<Self::Link> {
        let peripheral = self
            .adapter
            .peripherals()
            .await?
            .into_iter()
            .find(|p| p.id().to_string() == address)
            .ok_or_else(|| Error::DeviceNotFound(address.to_owned()))?;

        if !peripheral.is_connected().await? {
            peripheral.connect().await?;
        }
        peripheral.discover_services().await?;
        debug!(%address, "connected and discovered services");

        Ok(BtleLink { peripheral })
    }
}

/// True while a peripheral's properties are still worth querying: either
/// we have never seen this address, or every sighting so far lacked a
/// local name.
fn wants_name(found: &[DiscoveredDevice], address: &str) -> bool {
    !found
        .iter()
        .any(|d| d.address == address && d.name.is_some())
}

/// Records one sighting, updating the name of an already-seen address
/// rather than duplicating it.
fn record_sighting(found: &mut Vec<DiscoveredDevice>, address: String, name: Option<String>) {
    match found.iter_mut().find(|d| d.address == address) {
        Some(device) => {
            if name.is_some() {
                device.name = name;
            }
        }
        None => found.push(DiscoveredDevice { name, address }),
    }
}

/// A connected btleplug peripheral.
pub struct BtleLink {
    peripheral: Peripheral,
}

impl Link for BtleLink {
    fn characteristics(&self) -> Vec<Uuid> {
        self.peripheral
            .characteristics()
            .into_iter()
            .map(|c| c.uuid)
            .collect()
    }

    async fn is_connected(&self) -> bool {
        self.peripheral.is_connected().await.unwrap_or(false)
    }

    async fn write(&self, characteristic: Uuid, payload: &[u8], confirm: bool) -> Result<()> {
        let target = self
            .peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == characteristic)
            .ok_or(Error::CharacteristicNotFound(characteristic))?;

        let write_type = if confirm {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };
        self.peripheral.write(&target, payload, write_type).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        self.peripheral.disconnect().await?;
        Ok(())
    }
}
