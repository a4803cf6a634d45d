// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Devices screen scenarios driven through a recording transport.

use std::time::Duration;

use home_switches::event::{CONNECT_FAILED_TITLE, ScreenEvent, SyncEvent};
use home_switches::protocol::{RecordingTransport, TransportCall};
use home_switches::registry::{Device, DeviceId, DeviceRegistry};
use home_switches::screen::{DevicesScreen, ScreenHandle};
use home_switches::state::ConnectionState;
use home_switches::types::PowerState;
use home_switches::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

struct Fixture {
    handle: ScreenHandle,
    transport: RecordingTransport,
    events_tx: mpsc::Sender<SyncEvent>,
    screen_events: broadcast::Receiver<ScreenEvent>,
}

fn mount(registry: DeviceRegistry, transport: RecordingTransport) -> Fixture {
    let (events_tx, events_rx) = mpsc::channel(16);
    let screen = DevicesScreen::new(registry, transport.clone(), events_rx);
    let screen_events = screen.subscribe();
    let handle = screen.mount();
    Fixture {
        handle,
        transport,
        events_tx,
        screen_events,
    }
}

/// Waits until the snapshot satisfies `predicate`.
async fn wait_for(handle: &ScreenHandle, predicate: impl Fn(&home_switches::ScreenSnapshot) -> bool) {
    let mut watch = handle.watch();
    timeout(WAIT, watch.wait_for(|snapshot| predicate(snapshot)))
        .await
        .expect("timed out waiting for snapshot")
        .expect("screen task stopped");
}

async fn connect(fixture: &Fixture) {
    fixture.events_tx.send(SyncEvent::ConnectSuccess).await.unwrap();
    wait_for(&fixture.handle, |s| s.connection == ConnectionState::Connected).await;
}

mod mount_and_connect {
    use super::*;

    #[tokio::test]
    async fn mount_starts_with_every_device_off_and_connecting() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());

        let snapshot = fixture.handle.snapshot();
        assert_eq!(snapshot.connection, ConnectionState::Connecting);
        assert_eq!(snapshot.rows.len(), 4);
        assert!(snapshot.rows.iter().all(|row| !row.on));
        assert_eq!(fixture.transport.calls(), vec![TransportCall::Connect]);
    }

    #[tokio::test]
    async fn connect_success_forces_every_device_off() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;

        let topics = ["home/cooler", "home/fan", "home/light", "home/heater"];
        assert_eq!(fixture.transport.subscriptions(), topics);
        let publishes = fixture.transport.publishes();
        assert_eq!(publishes.len(), 4);
        for ((topic, state), expected) in publishes.iter().zip(topics) {
            assert_eq!(topic, expected);
            assert_eq!(*state, PowerState::Off);
        }
    }

    #[tokio::test]
    async fn connect_failure_shows_alert() {
        let mut fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        fixture
            .events_tx
            .send(SyncEvent::connect_failure("Bad user name or password"))
            .await
            .unwrap();

        let alert = timeout(WAIT, async {
            loop {
                let event = fixture.screen_events.recv().await.unwrap();
                if event.is_alert() {
                    return event;
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(
            alert,
            ScreenEvent::Alert {
                title: CONNECT_FAILED_TITLE.to_string(),
                message: "Bad user name or password".to_string(),
            }
        );
        wait_for(&fixture.handle, |s| s.connection == ConnectionState::Disconnected).await;
    }

    #[tokio::test]
    async fn transport_refusing_to_start_shows_alert() {
        let mut fixture = mount(
            DeviceRegistry::home(),
            RecordingTransport::new().failing_connect("offline"),
        );

        let alert = timeout(WAIT, async {
            loop {
                let event = fixture.screen_events.recv().await.unwrap();
                if event.is_alert() {
                    return event;
                }
            }
        })
        .await
        .unwrap();

        assert!(matches!(alert, ScreenEvent::Alert { message, .. } if message.contains("offline")));
    }
}

mod toggling {
    use super::*;

    #[tokio::test]
    async fn inbound_messages_move_switches() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;
        let light = DeviceId::from("3");

        fixture
            .events_tx
            .send(SyncEvent::message("home/light", "ON"))
            .await
            .unwrap();
        wait_for(&fixture.handle, |s| s.is_on(&light) == Some(true)).await;

        fixture
            .events_tx
            .send(SyncEvent::message("home/light", "maybe"))
            .await
            .unwrap();
        wait_for(&fixture.handle, |s| s.is_on(&light) == Some(false)).await;
    }

    #[tokio::test]
    async fn unknown_topic_is_ignored() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;
        let before = fixture.handle.snapshot();

        fixture
            .events_tx
            .send(SyncEvent::message("home/unknown", "ON"))
            .await
            .unwrap();
        // Intents are handled after pending transport events, so this
        // round-trip guarantees the message above was processed.
        assert!(matches!(
            fixture.handle.toggle("missing").await,
            Err(Error::DeviceNotFound(_))
        ));

        assert_eq!(fixture.handle.snapshot(), before);
    }

    #[tokio::test]
    async fn toggle_twice_publishes_opposite_payloads() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;
        fixture.transport.clear();

        assert!(fixture.handle.toggle("1").await.unwrap());
        assert!(!fixture.handle.toggle("1").await.unwrap());

        assert_eq!(
            fixture.transport.publishes(),
            vec![
                ("home/cooler".to_string(), PowerState::On),
                ("home/cooler".to_string(), PowerState::Off),
            ]
        );
        assert_eq!(fixture.handle.snapshot().is_on(&DeviceId::from("1")), Some(false));
    }

    #[tokio::test]
    async fn toggle_before_connection_is_local_only() {
        let mut fixture = mount(DeviceRegistry::home(), RecordingTransport::new());

        assert!(fixture.handle.toggle("2").await.unwrap());

        assert_eq!(fixture.handle.snapshot().is_on(&DeviceId::from("2")), Some(true));
        assert_eq!(fixture.transport.calls(), vec![TransportCall::Connect]);
        while let Ok(event) = fixture.screen_events.try_recv() {
            assert!(!event.is_alert(), "unexpected alert: {event:?}");
        }
    }

    #[tokio::test]
    async fn connection_lost_keeps_last_known_state() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;
        fixture.handle.toggle("4").await.unwrap();

        fixture
            .events_tx
            .send(SyncEvent::connection_lost(1, "keep-alive timeout"))
            .await
            .unwrap();
        wait_for(&fixture.handle, |s| s.connection == ConnectionState::Disconnected).await;

        assert_eq!(fixture.handle.snapshot().is_on(&DeviceId::from("4")), Some(true));
    }

    #[tokio::test]
    async fn single_device_scenario() {
        let registry =
            DeviceRegistry::new(vec![Device::new("1", "Cooler", "home/cooler")]).unwrap();
        let fixture = mount(registry, RecordingTransport::new());
        let cooler = DeviceId::from("1");
        assert_eq!(fixture.handle.snapshot().is_on(&cooler), Some(false));

        connect(&fixture).await;
        assert_eq!(
            fixture.transport.calls(),
            vec![
                TransportCall::Connect,
                TransportCall::Subscribe("home/cooler".to_string()),
                TransportCall::Publish {
                    topic: "home/cooler".to_string(),
                    state: PowerState::Off,
                },
            ]
        );

        fixture
            .events_tx
            .send(SyncEvent::message("home/cooler", "ON"))
            .await
            .unwrap();
        wait_for(&fixture.handle, |s| s.is_on(&cooler) == Some(true)).await;

        fixture.transport.clear();
        assert!(!fixture.handle.toggle("1").await.unwrap());
        assert_eq!(
            fixture.transport.publishes(),
            vec![("home/cooler".to_string(), PowerState::Off)]
        );
    }
}

mod unmount {
    use super::*;

    #[tokio::test]
    async fn unmount_disconnects_when_connected() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;
        fixture.transport.clear();

        fixture.handle.unmount().await;

        assert_eq!(fixture.transport.calls(), vec![TransportCall::Disconnect]);
        assert!(!fixture.handle.is_mounted());
        assert_eq!(
            fixture.handle.snapshot().connection,
            ConnectionState::Disconnected
        );
    }

    #[tokio::test]
    async fn unmount_while_connecting_skips_disconnect_and_closes_events() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        fixture.handle.unmount().await;

        assert_eq!(fixture.transport.calls(), vec![TransportCall::Connect]);
        assert!(fixture.events_tx.is_closed());
        assert!(
            fixture
                .events_tx
                .send(SyncEvent::ConnectSuccess)
                .await
                .is_err()
        );
        assert_eq!(fixture.transport.calls(), vec![TransportCall::Connect]);
    }

    #[tokio::test]
    async fn intents_after_unmount_fail() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        fixture.handle.unmount().await;
        fixture.handle.unmount().await;

        assert!(matches!(
            fixture.handle.toggle("1").await,
            Err(Error::ChannelClosed)
        ));
    }

    #[tokio::test]
    async fn dropping_every_handle_unmounts() {
        let fixture = mount(DeviceRegistry::home(), RecordingTransport::new());
        connect(&fixture).await;
        fixture.transport.clear();
        let mut watch = fixture.handle.watch();

        drop(fixture.handle);

        timeout(WAIT, watch.wait_for(|s| s.connection == ConnectionState::Disconnected))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fixture.transport.calls(), vec![TransportCall::Disconnect]);
    }
}
