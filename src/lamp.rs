//! High-level lamp client and its connection lifecycle.
//!
//! [`MoonsideLamp`] owns discovery, connection, characteristic resolution,
//! disconnection, and bounded reconnect. Control operations build a
//! [`Command`] and hand the encoded bytes to the transport as a confirmed
//! write. One in-flight request per instance; drive multiple lamps with
//! independent instances.

use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ble::btle::BtleTransport;
use crate::ble::{Link, Transport};
use crate::config::{DEFAULT_MAX_RECONNECT_ATTEMPTS, NUS_RX_CHAR_UUID, SCAN_WINDOW};
use crate::error::{Error, Result};
use crate::protocol::color::RgbColor;
use crate::protocol::theme::ThemeConfig;
use crate::protocol::Command;

/// Lifecycle of one lamp connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

/// Client for one Moonside lamp, generic over the BLE transport.
pub struct MoonsideLamp<T: Transport = BtleTransport> {
    transport: T,
    device_name: String,
    max_reconnect_attempts: u32,
    scan_window: Duration,
    state: ConnectionState,
    link: Option<T::Link>,
    rx_char: Option<Uuid>,
}

impl MoonsideLamp {
    /// Creates a client over the host's default Bluetooth adapter.
    ///
    /// `device_name` is the exact advertised BLE name of the lamp,
    /// e.g. `"MOONSIDE-S1"`. Nothing is connected until [`connect`] or
    /// [`session`] is called.
    ///
    /// [`connect`]: MoonsideLamp::connect
    /// [`session`]: MoonsideLamp::session
    pub async fn new(device_name: &str) -> Result<Self> {
        Ok(Self::with_transport(BtleTransport::new().await?, device_name))
    }
}

impl<T: Transport> MoonsideLamp<T> {
    /// Creates a client over a custom transport.
    pub fn with_transport(transport: T, device_name: &str) -> Self {
        Self {
            transport,
            device_name: device_name.to_owned(),
            max_reconnect_attempts: DEFAULT_MAX_RECONNECT_ATTEMPTS,
            scan_window: SCAN_WINDOW,
            state: ConnectionState::Disconnected,
            link: None,
            rx_char: None,
        }
    }

    /// Reconnect attempts made by [`ensure_connected`] before giving up.
    /// Zero disables reconnection entirely, so a dropped link surfaces on
    /// the next send.
    ///
    /// [`ensure_connected`]: MoonsideLamp::ensure_connected
    pub fn max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = attempts;
        self
    }

    /// Overrides the scan window used during discovery.
    pub fn scan_window(mut self, window: Duration) -> Self {
        self.scan_window = window;
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Scans for the lamp by advertised name, connects, and resolves the
    /// NUS RX write characteristic. The state becomes `Connected` only
    /// after both the transport connection and characteristic resolution
    /// succeed; any failure resets to `Disconnected`.
    pub async fn connect(&mut self) -> Result<()> {
        self.state = ConnectionState::Connecting;
        match self.try_connect().await {
            Ok(()) => {
                self.state = ConnectionState::Connected;
                info!(device = %self.device_name, "lamp connected");
                Ok(())
            }
            Err(e) => {
                self.link = None;
                self.rx_char = None;
                self.state = ConnectionState::Disconnected;
                Err(e)
            }
        }
    }

    async fn try_connect(&mut self) -> Result<()> {
        let devices = self.transport.scan(self.scan_window).await?;
        let device = devices
            .into_iter()
            .find(|d| d.name.as_deref() == Some(self.device_name.as_str()))
            .ok_or_else(|| Error::DeviceNotFound(self.device_name.clone()))?;

        let link = self.transport.connect(&device.address).await?;

        if !link.characteristics().contains(&NUS_RX_CHAR_UUID) {
            // Not a NUS device after all; don't hold the connection open.
            let _ = link.disconnect().await;
            return Err(Error::CharacteristicNotFound(NUS_RX_CHAR_UUID));
        }

        self.link = Some(link);
        self.rx_char = Some(NUS_RX_CHAR_UUID);
        Ok(())
    }

    /// Closes the connection. Best-effort cleanup: transport close
    /// failures are swallowed, and the held link and characteristic are
    /// always cleared.
    pub async fn disconnect(&mut self) {
        if let Some(link) = self.link.take() {
            if link.is_connected().await {
                if let Err(e) = link.disconnect().await {
                    debug!(device = %self.device_name, error = %e, "ignoring close failure");
                }
            }
        }
        self.rx_char = None;
        self.state = ConnectionState::Disconnected;
        info!(device = %self.device_name, "lamp disconnected");
    }

    /// Guarantees a live link, reconnecting up to the configured attempt
    /// count. Individual attempt failures are absorbed; exhausting them
    /// fails with [`Error::ReconnectExhausted`].
    pub async fn ensure_connected(&mut self) -> Result<()> {
        if self.state == ConnectionState::Connected {
            if let Some(link) = &self.link {
                if link.is_connected().await {
                    return Ok(());
                }
            }
            debug!(device = %self.device_name, "link lost, reconnecting");
        }

        let attempts = self.max_reconnect_attempts;
        for attempt in 1..=attempts {
            match self.connect().await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!(
                        device = %self.device_name,
                        attempt,
                        max = attempts,
                        error = %e,
                        "reconnect attempt failed"
                    );
                }
            }
        }
        Err(Error::ReconnectExhausted(attempts))
    }

    /// Validates and encodes `command`, then issues a confirmed write to
    /// the resolved characteristic. Encoding failures abort before any
    /// transmission; write failures are surfaced, not retried.
    pub async fn send_command(&mut self, command: Command) -> Result<()> {
        let text = command.encode()?;

        self.ensure_connected().await?;
        let (link, rx_char) = match (&self.link, self.rx_char) {
            (Some(link), Some(rx_char)) => (link, rx_char),
            _ => return Err(Error::NotConnected),
        };

        debug!(device = %self.device_name, command = %text, "sending");
        link.write(rx_char, text.as_bytes(), true).await
    }

    // Basic controls

    pub async fn turn_on(&mut self) -> Result<()> {
        self.send_command(Command::PowerOn).await
    }

    pub async fn turn_off(&mut self) -> Result<()> {
        self.send_command(Command::PowerOff).await
    }

    /// Sets overall brightness (0..=120).
    pub async fn set_brightness(&mut self, brightness: u8) -> Result<()> {
        self.send_command(Command::Brightness(brightness)).await
    }

    /// Sets a solid color, optionally with a brightness (0..=120).
    pub async fn set_color(&mut self, color: RgbColor, brightness: Option<u8>) -> Result<()> {
        self.send_command(Command::Color { color, brightness }).await
    }

    // Themes

    /// Applies an animated theme. The config is validated before any
    /// bytes leave the host.
    pub async fn set_theme(&mut self, config: ThemeConfig) -> Result<()> {
        self.send_command(Command::Theme(config)).await
    }

    // Pixel-level control

    /// Sets a single pixel's brightness (0..=120) and color. Call
    /// [`apply_pixel_mode`] afterwards to make the changes visible.
    ///
    /// [`apply_pixel_mode`]: MoonsideLamp::apply_pixel_mode
    pub async fn set_pixel(&mut self, pixel_id: u16, brightness: u8, color: RgbColor) -> Result<()> {
        self.send_command(Command::Pixel {
            pixel_id,
            brightness,
            color,
        })
        .await
    }

    pub async fn apply_pixel_mode(&mut self) -> Result<()> {
        self.send_command(Command::ApplyPixelMode).await
    }

    /// Runs `body` inside a managed session: connects first, and
    /// disconnects when the body finishes, on success or on error,
    /// before propagating its result.
    ///
    /// ```no_run
    /// use futures::FutureExt;
    /// use moonside::MoonsideLamp;
    ///
    /// # async fn demo() -> moonside::Result<()> {
    /// let mut lamp = MoonsideLamp::new("MOONSIDE-S1").await?;
    /// lamp.session(|lamp| {
    ///     async move {
    ///         lamp.turn_on().await?;
    ///         lamp.set_brightness(80).await
    ///     }
    ///     .boxed()
    /// })
    /// .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn session<R, F>(&mut self, body: F) -> Result<R>
    where
        F: for<'a> FnOnce(&'a mut Self) -> BoxFuture<'a, Result<R>>,
    {
        self.connect().await?;
        let result = body(self).await;
        self.disconnect().await;
        result
    }
}
