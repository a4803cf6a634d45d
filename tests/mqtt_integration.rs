// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the MQTT transport using mockforge-mqtt.

use std::time::Duration;

use home_switches::config::BrokerConfig;
use home_switches::event::{CONNECT_FAILED_TITLE, ScreenEvent};
use home_switches::registry::DeviceRegistry;
use home_switches::screen::DevicesScreen;
use home_switches::state::ConnectionState;
use mockforge_mqtt::broker::MqttConfig;
use mockforge_mqtt::start_mqtt_server;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};

const WAIT: Duration = Duration::from_secs(5);

/// Helper to find an available port for testing.
fn get_test_port() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static PORT_COUNTER: AtomicU16 = AtomicU16::new(18950);
    PORT_COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Starts a mock MQTT broker on the given port.
async fn start_mock_broker(port: u16) {
    let config = MqttConfig {
        port,
        host: "127.0.0.1".to_string(),
        ..Default::default()
    };

    tokio::spawn(async move {
        let _ = start_mqtt_server(config).await;
    });

    // Give the broker time to bind before clients connect
    sleep(Duration::from_millis(500)).await;
}

fn plain_tcp_config(port: u16) -> BrokerConfig {
    BrokerConfig::builder()
        .host("127.0.0.1")
        .port(port)
        .tls(false)
        .path("")
        .build()
        .unwrap()
}

/// Waits for the first screen event matching `predicate`.
async fn next_matching(
    events: &mut broadcast::Receiver<ScreenEvent>,
    predicate: impl Fn(&ScreenEvent) -> bool,
) -> ScreenEvent {
    timeout(WAIT, async {
        loop {
            let event = events.recv().await.expect("event bus closed");
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for screen event")
}

// ============================================================================
// Connection Tests
// ============================================================================

mod connection {
    use super::*;

    #[tokio::test]
    async fn connects_to_broker() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let screen = DevicesScreen::connect_mqtt(DeviceRegistry::home(), plain_tcp_config(port));
        let mut events = screen.subscribe();
        let handle = screen.mount();

        next_matching(&mut events, |e| {
            matches!(
                e,
                ScreenEvent::ConnectionChanged {
                    state: ConnectionState::Connected
                }
            )
        })
        .await;

        assert!(handle.snapshot().connection.is_connected());
        handle.unmount().await;
    }

    #[tokio::test]
    async fn toggle_while_connected_succeeds() {
        let port = get_test_port();
        start_mock_broker(port).await;

        let screen = DevicesScreen::connect_mqtt(DeviceRegistry::home(), plain_tcp_config(port));
        let mut events = screen.subscribe();
        let handle = screen.mount();
        next_matching(&mut events, |e| {
            matches!(
                e,
                ScreenEvent::ConnectionChanged {
                    state: ConnectionState::Connected
                }
            )
        })
        .await;

        let on = handle.toggle("1").await;

        assert!(matches!(on, Ok(true)), "toggle failed: {on:?}");
        handle.unmount().await;
        assert_eq!(
            handle.snapshot().connection,
            ConnectionState::Disconnected
        );
    }

    #[tokio::test]
    async fn unreachable_broker_raises_alert() {
        // Nothing listens on port 1
        let screen = DevicesScreen::connect_mqtt(DeviceRegistry::home(), plain_tcp_config(1));
        let mut events = screen.subscribe();
        let handle = screen.mount();

        let alert = next_matching(&mut events, ScreenEvent::is_alert).await;

        assert!(matches!(alert, ScreenEvent::Alert { title, .. } if title == CONNECT_FAILED_TITLE));
        assert_eq!(
            handle.snapshot().connection,
            ConnectionState::Disconnected
        );
    }
}

// NOTE: The mockforge-mqtt broker doesn't reliably forward publishes
// between clients, so inbound message handling is covered by the
// recording transport tests in tests/screen.rs.
