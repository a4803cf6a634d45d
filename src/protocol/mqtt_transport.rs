// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MQTT transport built on `rumqttc`.
//!
//! # Examples
//!
//! ```no_run
//! use home_switches::config::BrokerConfig;
//! use home_switches::protocol::{MqttTransport, Transport};
//!
//! # async fn example() -> home_switches::Result<()> {
//! let config = BrokerConfig::builder()
//!     .host("broker.example.com")
//!     .credentials("user", "secret")
//!     .build()?;
//!
//! let (mut transport, mut events) = MqttTransport::new(config);
//! transport.connect()?;
//!
//! while let Some(event) = events.recv().await {
//!     println!("{event:?}");
//! }
//! # Ok(())
//! # }
//! ```

use rumqttc::{
    AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS,
    Transport as NetTransport,
};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::config::BrokerConfig;
use crate::error::ProtocolError;
use crate::event::SyncEvent;
use crate::types::PowerState;

use super::Transport;

/// Capacity of the channel carrying events to the sync manager.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Capacity of the rumqttc request queue.
const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// Generates a random client identifier for one session.
///
/// # Examples
///
/// ```
/// use home_switches::protocol::generate_client_id;
///
/// let id = generate_client_id();
/// assert!(id.starts_with("clientId-"));
/// assert_ne!(id, generate_client_id());
/// ```
#[must_use]
pub fn generate_client_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("clientId-{}", &hex[..16])
}

/// A single MQTT connection feeding [`SyncEvent`]s to one receiver.
///
/// Each call to [`connect`](Transport::connect) uses a fresh random client
/// identifier and spawns a task that polls the rumqttc event loop. The task
/// stops after the first connect failure or connection loss; there is no
/// automatic reconnection. It also stops once the event receiver is dropped.
///
/// Subscriptions and publishes use QoS 0 and are not retained.
#[derive(Debug)]
pub struct MqttTransport {
    config: BrokerConfig,
    events_tx: mpsc::Sender<SyncEvent>,
    client: Option<AsyncClient>,
    client_id: Option<String>,
}

impl MqttTransport {
    /// Creates an unconnected transport and the receiver for its events.
    #[must_use]
    pub fn new(config: BrokerConfig) -> (Self, mpsc::Receiver<SyncEvent>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let transport = Self {
            config,
            events_tx,
            client: None,
            client_id: None,
        };
        (transport, events_rx)
    }

    /// Returns the broker configuration.
    #[must_use]
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Returns the client identifier of the current session, once connecting.
    #[must_use]
    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn client(&self) -> Result<&AsyncClient, ProtocolError> {
        self.client.as_ref().ok_or(ProtocolError::NotConnected)
    }
}

impl Transport for MqttTransport {
    fn connect(&mut self) -> Result<(), ProtocolError> {
        if self.client.is_some() {
            return Err(ProtocolError::ConnectionFailed(
                "a connection attempt was already made".to_string(),
            ));
        }
        self.config
            .validate()
            .map_err(|e| ProtocolError::InvalidAddress(e.to_string()))?;

        let client_id = generate_client_id();
        let (address, transport) = broker_address(&self.config);

        let mut mqtt_options = MqttOptions::new(&client_id, address.as_str(), self.config.port());
        mqtt_options.set_keep_alive(self.config.keep_alive());
        mqtt_options.set_clean_session(true);
        mqtt_options.set_transport(transport);

        if let Some(credentials) = self.config.credentials() {
            mqtt_options.set_credentials(&credentials.username, &credentials.password);
        }

        let (client, event_loop) = AsyncClient::new(mqtt_options, REQUEST_CHANNEL_CAPACITY);

        tracing::info!(
            address = %address,
            port = %self.config.port(),
            client_id = %client_id,
            "Connecting to MQTT broker"
        );

        let events_tx = self.events_tx.clone();
        tokio::spawn(async move {
            handle_mqtt_events(event_loop, events_tx).await;
        });

        self.client = Some(client);
        self.client_id = Some(client_id);
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<(), ProtocolError> {
        self.client()?
            .try_subscribe(topic, QoS::AtMostOnce)
            .map_err(ProtocolError::Mqtt)
    }

    fn publish(&self, topic: &str, state: PowerState) -> Result<(), ProtocolError> {
        self.client()?
            .try_publish(topic, QoS::AtMostOnce, false, state.as_str())
            .map_err(ProtocolError::Mqtt)
    }

    fn disconnect(&self) -> Result<(), ProtocolError> {
        self.client()?.try_disconnect().map_err(ProtocolError::Mqtt)
    }
}

/// Derives the rumqttc address and transport from the configuration.
///
/// A non-empty path selects WebSockets, where rumqttc expects the full URL
/// as the address.
fn broker_address(config: &BrokerConfig) -> (String, NetTransport) {
    let host = config.host();
    let port = config.port();
    let path = config.path();

    if path.is_empty() {
        let transport = if config.tls() {
            NetTransport::tls_with_default_config()
        } else {
            NetTransport::Tcp
        };
        return (host.to_string(), transport);
    }

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    if config.tls() {
        (
            format!("wss://{host}:{port}{path}"),
            NetTransport::wss_with_default_config(),
        )
    } else {
        (format!("ws://{host}:{port}{path}"), NetTransport::Ws)
    }
}

/// Polls the rumqttc event loop and forwards what the manager cares about.
async fn handle_mqtt_events(mut event_loop: EventLoop, events_tx: mpsc::Sender<SyncEvent>) {
    let mut connected = false;

    loop {
        let event = match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                tracing::debug!(?connack, "MQTT broker connected");
                if connack.code == ConnectReturnCode::Success {
                    connected = true;
                    SyncEvent::ConnectSuccess
                } else {
                    SyncEvent::connect_failure(format!("connection refused: {:?}", connack.code))
                }
            }
            Ok(Event::Incoming(Packet::SubAck(suback))) => {
                tracing::debug!(?suback, "MQTT subscription acknowledged");
                continue;
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                let Ok(payload) = String::from_utf8(publish.payload.to_vec()) else {
                    tracing::warn!(topic = %publish.topic, "Ignoring non UTF-8 payload");
                    continue;
                };
                tracing::debug!(
                    topic = %publish.topic,
                    payload = %payload,
                    "MQTT message received"
                );
                SyncEvent::message(publish.topic, payload)
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                SyncEvent::connection_lost(1, "broker closed the connection")
            }
            Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                SyncEvent::connection_lost(0, "disconnected by client")
            }
            Ok(_) => continue,
            Err(e) if connected => SyncEvent::connection_lost(1, e.to_string()),
            Err(e) => SyncEvent::connect_failure(e.to_string()),
        };

        let terminal = matches!(
            event,
            SyncEvent::ConnectFailure { .. } | SyncEvent::ConnectionLost { .. }
        );

        if events_tx.send(event).await.is_err() {
            tracing::debug!("Event receiver dropped, stopping MQTT event loop");
            break;
        }
        if terminal {
            break;
        }
    }
}
