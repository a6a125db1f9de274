//! Integration tests for the connection lifecycle and animation driver,
//! run against a mock BLE transport that records every confirmed write.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::FutureExt;
use moonside::ble::{DiscoveredDevice, Link, Transport};
use moonside::config::NUS_RX_CHAR_UUID;
use moonside::{
    animate_theme, ConnectionState, Error, MoonsideLamp, RgbColor, ThemeAnimation,
};
use uuid::Uuid;

const LAMP_NAME: &str = "MOONSIDE-S1";

#[derive(Debug, Clone, PartialEq)]
struct WriteRecord {
    characteristic: Uuid,
    payload: Vec<u8>,
    confirm: bool,
}

#[derive(Default)]
struct Shared {
    connect_attempts: AtomicU32,
    disconnects: AtomicUsize,
    link_alive: AtomicBool,
    writes: Mutex<Vec<WriteRecord>>,
}

impl Shared {
    fn payloads(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .map(|w| String::from_utf8(w.payload.clone()).unwrap())
            .collect()
    }
}

struct MockTransport {
    advertised: Vec<DiscoveredDevice>,
    characteristics: Vec<Uuid>,
    fail_connect: bool,
    shared: Arc<Shared>,
}

impl MockTransport {
    /// A healthy lamp advertising the expected name and NUS RX.
    fn lamp() -> Self {
        Self {
            advertised: vec![DiscoveredDevice {
                name: Some(LAMP_NAME.to_owned()),
                address: "aa:bb:cc:dd:ee:ff".to_owned(),
            }],
            characteristics: vec![NUS_RX_CHAR_UUID],
            fail_connect: false,
            shared: Arc::default(),
        }
    }

    fn without_rx_characteristic() -> Self {
        Self {
            characteristics: vec![Uuid::from_u128(0xdead_beef)],
            ..Self::lamp()
        }
    }

    fn failing_connect() -> Self {
        Self {
            fail_connect: true,
            ..Self::lamp()
        }
    }

    fn other_devices_only() -> Self {
        Self {
            advertised: vec![DiscoveredDevice {
                name: Some("SOMEBODY-ELSE".to_owned()),
                address: "11:22:33:44:55:66".to_owned(),
            }],
            ..Self::lamp()
        }
    }

    fn shared(&self) -> Arc<Shared> {
        Arc::clone(&self.shared)
    }
}

impl Transport for MockTransport {
    type Link = MockLink;

    async fn scan(&self, _window: Duration) -> moonside::Result<Vec<DiscoveredDevice>> {
        Ok(self.advertised.clone())
    }

    async fn connect(&self, _address: &str) -> moonside::Result<MockLink> {
        self.shared.connect_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect {
            return Err(Error::Ble(btleplug::Error::RuntimeError(
                "simulated connect failure".to_owned(),
            )));
        }
        self.shared.link_alive.store(true, Ordering::SeqCst);
        Ok(MockLink {
            characteristics: self.characteristics.clone(),
            shared: Arc::clone(&self.shared),
        })
    }
}

struct MockLink {
    characteristics: Vec<Uuid>,
    shared: Arc<Shared>,
}

impl Link for MockLink {
    fn characteristics(&self) -> Vec<Uuid> {
        self.characteristics.clone()
    }

    async fn is_connected(&self) -> bool {
        self.shared.link_alive.load(Ordering::SeqCst)
    }

    async fn write(
        &self,
        characteristic: Uuid,
        payload: &[u8],
        confirm: bool,
    ) -> moonside::Result<()> {
        self.shared.writes.lock().unwrap().push(WriteRecord {
            characteristic,
            payload: payload.to_vec(),
            confirm,
        });
        Ok(())
    }

    async fn disconnect(&self) -> moonside::Result<()> {
        self.shared.disconnects.fetch_add(1, Ordering::SeqCst);
        self.shared.link_alive.store(false, Ordering::SeqCst);
        Ok(())
    }
}

// Connection lifecycle

#[tokio::test]
async fn connect_resolves_write_characteristic() {
    let mut lamp = MoonsideLamp::with_transport(MockTransport::lamp(), LAMP_NAME);
    assert_eq!(lamp.state(), ConnectionState::Disconnected);

    lamp.connect().await.unwrap();
    assert_eq!(lamp.state(), ConnectionState::Connected);
}

#[tokio::test]
async fn connect_fails_when_device_absent() {
    let mut lamp = MoonsideLamp::with_transport(MockTransport::other_devices_only(), LAMP_NAME);

    match lamp.connect().await {
        Err(Error::DeviceNotFound(name)) => assert_eq!(name, LAMP_NAME),
        other => panic!("expected DeviceNotFound, got {other:?}"),
    }
    assert_eq!(lamp.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn connect_closes_link_when_rx_characteristic_missing() {
    let transport = MockTransport::without_rx_characteristic();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);

    match lamp.connect().await {
        Err(Error::CharacteristicNotFound(uuid)) => assert_eq!(uuid, NUS_RX_CHAR_UUID),
        other => panic!("expected CharacteristicNotFound, got {other:?}"),
    }
    // The transport connection itself succeeded, so it must be closed.
    assert_eq!(shared.disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(lamp.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn ensure_connected_exhausts_configured_attempts() {
    let transport = MockTransport::failing_connect();
    let shared = transport.shared();
    let mut lamp =
        MoonsideLamp::with_transport(transport, LAMP_NAME).max_reconnect_attempts(3);

    match lamp.ensure_connected().await {
        Err(Error::ReconnectExhausted(attempts)) => assert_eq!(attempts, 3),
        other => panic!("expected ReconnectExhausted, got {other:?}"),
    }
    assert_eq!(shared.connect_attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn zero_attempts_disables_reconnection() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp =
        MoonsideLamp::with_transport(transport, LAMP_NAME).max_reconnect_attempts(0);

    assert!(matches!(
        lamp.ensure_connected().await,
        Err(Error::ReconnectExhausted(0))
    ));
    assert_eq!(shared.connect_attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn ensure_connected_is_a_noop_on_a_live_link() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);

    lamp.connect().await.unwrap();
    lamp.ensure_connected().await.unwrap();
    assert_eq!(shared.connect_attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn lost_link_reconnects_on_next_send() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);
    lamp.connect().await.unwrap();

    // The transport drops the link out from under us; nothing notices
    // until the next command forces the liveness check.
    shared.link_alive.store(false, Ordering::SeqCst);

    lamp.turn_on().await.unwrap();
    assert_eq!(shared.connect_attempts.load(Ordering::SeqCst), 2);
    assert_eq!(lamp.state(), ConnectionState::Connected);
    assert_eq!(shared.payloads(), vec!["LEDON"]);
}

// Command transmission

#[tokio::test]
async fn commands_are_confirmed_ascii_writes() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);
    lamp.connect().await.unwrap();

    lamp.turn_on().await.unwrap();
    lamp.set_brightness(80).await.unwrap();
    lamp.set_color(RgbColor::new(0, 255, 0), Some(60)).await.unwrap();
    lamp.set_pixel(1, 50, RgbColor::new(255, 0, 0)).await.unwrap();
    lamp.apply_pixel_mode().await.unwrap();

    assert_eq!(
        shared.payloads(),
        vec![
            "LEDON",
            "BRIGH080",
            "COLOR000255000 60",
            "PIXEL,1,50 COLOR255000000",
            "MODEPIXEL",
        ]
    );
    for write in shared.writes.lock().unwrap().iter() {
        assert_eq!(write.characteristic, NUS_RX_CHAR_UUID);
        assert!(write.confirm);
    }
}

#[tokio::test]
async fn validation_failure_transmits_nothing() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);
    lamp.connect().await.unwrap();

    assert!(matches!(
        lamp.set_brightness(121).await,
        Err(Error::BrightnessOutOfRange(121))
    ));
    assert!(shared.payloads().is_empty());
}

// Scoped sessions

#[tokio::test]
async fn session_disconnects_after_body_error() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);

    let result = lamp
        .session(|lamp| async move { lamp.set_brightness(200).await }.boxed())
        .await;

    assert!(matches!(result, Err(Error::BrightnessOutOfRange(200))));
    assert_eq!(shared.disconnects.load(Ordering::SeqCst), 1);
    assert_eq!(lamp.state(), ConnectionState::Disconnected);
}

#[tokio::test]
async fn session_skips_body_when_connect_fails() {
    let mut lamp = MoonsideLamp::with_transport(MockTransport::other_devices_only(), LAMP_NAME);

    let result: moonside::Result<()> = lamp
        .session(|_lamp| async move { unreachable!("body must not run") }.boxed())
        .await;

    assert!(matches!(result, Err(Error::DeviceNotFound(_))));
}

// Animation driver

fn gradient_animation(duration: Duration) -> ThemeAnimation {
    ThemeAnimation::new(
        duration,
        vec![RgbColor::new(0, 0, 0), RgbColor::new(255, 255, 255)],
        vec![RgbColor::new(255, 0, 0), RgbColor::new(0, 0, 255)],
        10,
        90,
    )
}

#[tokio::test]
async fn zero_duration_animation_sends_end_values_once() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);
    lamp.connect().await.unwrap();

    animate_theme(&mut lamp, &gradient_animation(Duration::ZERO))
        .await
        .unwrap();

    assert_eq!(
        shared.payloads(),
        vec!["THEME.GRADIENT1.255,0,0,0,0,255,", "BRIGH090"]
    );
}

#[tokio::test]
async fn mismatched_color_lists_send_nothing() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);
    lamp.connect().await.unwrap();

    let mut animation = gradient_animation(Duration::from_secs(1));
    animation.end_colors.pop();

    match animate_theme(&mut lamp, &animation).await {
        Err(Error::ColorCountMismatch { start, end }) => {
            assert_eq!(start, 2);
            assert_eq!(end, 1);
        }
        other => panic!("expected ColorCountMismatch, got {other:?}"),
    }
    assert!(shared.payloads().is_empty());
}

#[tokio::test(start_paused = true)]
async fn animation_paces_commands_and_lands_on_end_values() {
    let transport = MockTransport::lamp();
    let shared = transport.shared();
    let mut lamp = MoonsideLamp::with_transport(transport, LAMP_NAME);
    lamp.connect().await.unwrap();

    // Two theme intervals long: progress advances only while the pacer
    // sleeps, so the loop runs a small, deterministic number of times.
    let animation = gradient_animation(Duration::from_millis(300));
    animate_theme(&mut lamp, &animation).await.unwrap();

    let payloads = shared.payloads();
    let themes: Vec<&String> = payloads.iter().filter(|p| p.starts_with("THEME.")).collect();
    let brightnesses: Vec<&String> =
        payloads.iter().filter(|p| p.starts_with("BRIGH")).collect();

    // Theme and brightness commands alternate, one pair per iteration.
    assert_eq!(themes.len(), brightnesses.len());
    assert!(themes.len() >= 2);

    assert_eq!(themes.first().unwrap().as_str(), "THEME.GRADIENT1.0,0,0,255,255,255,");
    assert_eq!(themes.last().unwrap().as_str(), "THEME.GRADIENT1.255,0,0,0,0,255,");
    assert_eq!(brightnesses.first().unwrap().as_str(), "BRIGH010");
    assert_eq!(brightnesses.last().unwrap().as_str(), "BRIGH090");
}
