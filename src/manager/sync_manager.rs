// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device-state synchronization between the screen and the broker.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::error::{Error, Result};
use crate::event::{EventBus, ScreenEvent, SyncEvent};
use crate::protocol::Transport;
use crate::registry::{DeviceId, DeviceRegistry};
use crate::state::{ConnectionState, DeviceRow, DeviceStates};
use crate::types::PowerState;

/// Keeps the on/off state of every registered device in sync with the broker.
///
/// The manager owns the connection (through its [`Transport`]) and the
/// [`DeviceStates`] mapping. It never blocks and never awaits: connection
/// outcomes and inbound messages are fed to [`handle`](Self::handle) as
/// [`SyncEvent`]s, and user intents arrive through [`toggle`](Self::toggle).
/// All of these run in one mutator context, so no locking is involved.
///
/// # Protocol
///
/// - On connect success every device topic is subscribed and then sent
///   `OFF`, in registry order.
/// - Inbound `ON` (any case, trimmed) sets a device on; any other payload
///   sets it off. Topics outside the registry are ignored.
/// - A toggle flips the local state first and publishes only when
///   connected. A failed publish is logged and the local state stays
///   flipped.
/// - Connect failures raise an alert. Nothing is retried.
///
/// # Examples
///
/// ```
/// use home_switches::event::SyncEvent;
/// use home_switches::manager::SyncManager;
/// use home_switches::protocol::RecordingTransport;
/// use home_switches::registry::{DeviceId, DeviceRegistry};
/// use home_switches::types::PowerState;
///
/// let transport = RecordingTransport::new();
/// let mut manager = SyncManager::new(DeviceRegistry::home(), transport.clone());
///
/// manager.initialize();
/// manager.handle(SyncEvent::ConnectSuccess);
/// assert_eq!(transport.subscriptions().len(), 4);
///
/// manager.handle(SyncEvent::message("home/fan", "ON"));
/// assert_eq!(manager.state(&DeviceId::from("2")), Some(true));
///
/// manager.toggle(&DeviceId::from("2")).unwrap();
/// assert_eq!(
///     transport.publishes().last(),
///     Some(&("home/fan".to_string(), PowerState::Off))
/// );
/// ```
#[derive(Debug)]
pub struct SyncManager<T> {
    registry: Arc<DeviceRegistry>,
    states: DeviceStates,
    connection: ConnectionState,
    transport: T,
    event_bus: EventBus,
    torn_down: bool,
}

impl<T: Transport> SyncManager<T> {
    /// Creates a manager with every device off and no connection.
    #[must_use]
    pub fn new(registry: impl Into<Arc<DeviceRegistry>>, transport: T) -> Self {
        let registry = registry.into();
        let states = DeviceStates::new(&registry);
        Self {
            registry,
            states,
            connection: ConnectionState::Disconnected,
            transport,
            event_bus: EventBus::new(),
            torn_down: false,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Subscribes to screen events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ScreenEvent> {
        self.event_bus.subscribe()
    }

    /// Returns the event bus.
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns the device registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Returns the transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the connection state.
    #[must_use]
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Returns whether the connection is established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Returns the switch value of a device, or `None` if it is not registered.
    #[must_use]
    pub fn state(&self, id: &DeviceId) -> Option<bool> {
        self.states.get(id).map(|state| state.is_on())
    }

    /// Returns the full state mapping.
    #[must_use]
    pub fn states(&self) -> &DeviceStates {
        &self.states
    }

    /// Returns one row per device in registry order.
    #[must_use]
    pub fn rows(&self) -> Vec<DeviceRow> {
        self.registry
            .iter()
            .map(|device| DeviceRow {
                id: device.id().clone(),
                name: device.name().to_string(),
                on: self.states.is_on(device.id()),
            })
            .collect()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Starts the single connection attempt.
    ///
    /// Does nothing when an attempt is already running, when connected, or
    /// after teardown. If the transport cannot even start, the failure is
    /// handled like an asynchronous connect failure.
    pub fn initialize(&mut self) {
        if self.torn_down {
            tracing::warn!("Ignoring initialize after teardown");
            return;
        }
        if self.connection != ConnectionState::Disconnected {
            tracing::debug!(state = %self.connection, "Connection already initialized");
            return;
        }

        self.set_connection(ConnectionState::Connecting);
        if let Err(e) = self.transport.connect() {
            self.on_connect_failure(&e.to_string());
        }
    }

    /// Closes the connection if it is established.
    ///
    /// Events arriving afterwards are ignored, including the outcome of an
    /// attempt that was still in flight.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if !self.connection.is_connected() {
            return;
        }
        if let Err(e) = self.transport.disconnect() {
            tracing::warn!(error = %e, "MQTT disconnect failed");
        }
        self.set_connection(ConnectionState::Disconnected);
    }

    /// Returns `true` once [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Applies one transport event.
    pub fn handle(&mut self, event: SyncEvent) {
        if self.torn_down {
            tracing::debug!(?event, "Ignoring event after teardown");
            return;
        }

        match event {
            SyncEvent::ConnectSuccess => self.on_connect_success(),
            SyncEvent::ConnectFailure { reason } => self.on_connect_failure(&reason),
            SyncEvent::ConnectionLost { code, message } => self.on_connection_lost(code, &message),
            SyncEvent::MessageArrived { topic, payload } => self.on_message(&topic, &payload),
        }
    }

    fn on_connect_success(&mut self) {
        if self.connection != ConnectionState::Connecting {
            tracing::debug!(state = %self.connection, "Unexpected connect success ignored");
            return;
        }
        self.set_connection(ConnectionState::Connected);
        tracing::info!("MQTT connected");

        for device in self.registry.iter() {
            let topic = device.topic();
            if let Err(e) = self.transport.subscribe(topic) {
                tracing::warn!(topic = %topic, error = %e, "Subscribe failed");
            }
            match self.transport.publish(topic, PowerState::Off) {
                Ok(()) => tracing::info!(topic = %topic, "Forced OFF sent"),
                Err(e) => tracing::warn!(topic = %topic, error = %e, "Forced OFF failed"),
            }
        }
    }

    fn on_connect_failure(&mut self, reason: &str) {
        if self.connection != ConnectionState::Connecting {
            tracing::debug!(state = %self.connection, "Unexpected connect failure ignored");
            return;
        }
        tracing::error!(reason = %reason, "MQTT connect failed");
        self.set_connection(ConnectionState::Disconnected);
        self.event_bus.publish(ScreenEvent::connect_failed(reason));
    }

    fn on_connection_lost(&mut self, code: i32, message: &str) {
        if code != 0 {
            tracing::warn!(code, message = %message, "MQTT connection lost");
        }
        if self.connection != ConnectionState::Disconnected {
            self.set_connection(ConnectionState::Disconnected);
        }
    }

    fn on_message(&mut self, topic: &str, payload: &str) {
        let Some(device) = self.registry.by_topic(topic) else {
            tracing::trace!(topic = %topic, "Ignoring message for unknown topic");
            return;
        };
        let device_id = device.id().clone();
        let state = PowerState::from_payload(payload);
        tracing::debug!(device = %device_id, topic = %topic, state = %state, "Device state received");
        self.apply(&device_id, state);
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Flips a device and publishes the new value when connected.
    ///
    /// The local state changes first and is kept even if the publish fails.
    /// While disconnected nothing is sent and no error is raised.
    ///
    /// Returns the new switch value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] if the device is not registered;
    /// nothing is changed in that case.
    pub fn toggle(&mut self, id: &DeviceId) -> Result<bool> {
        let Some(device) = self.registry.by_id(id) else {
            return Err(Error::DeviceNotFound(id.clone()));
        };
        let topic = device.topic().to_string();

        let current = self.states.get(id).unwrap_or_default();
        let next = current.toggled();
        self.apply(id, next);

        if !self.connection.is_connected() {
            tracing::warn!(device = %id, "MQTT client not connected");
            return Ok(next.is_on());
        }

        match self.transport.publish(&topic, next) {
            Ok(()) => tracing::info!(topic = %topic, payload = %next, "Sent device state"),
            Err(e) => tracing::warn!(topic = %topic, error = %e, "Publish failed"),
        }
        Ok(next.is_on())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn apply(&mut self, id: &DeviceId, state: PowerState) {
        if let Some(previous) = self.states.set(id, state)
            && previous != state
        {
            self.event_bus.publish(ScreenEvent::StateChanged {
                device_id: id.clone(),
                on: state.is_on(),
            });
        }
    }

    fn set_connection(&mut self, state: ConnectionState) {
        tracing::debug!(from = %self.connection, to = %state, "Connection state changed");
        self.connection = state;
        self.event_bus
            .publish(ScreenEvent::ConnectionChanged { state });
    }
}
