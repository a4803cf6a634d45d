// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The devices screen: mount, toggle, unmount.
//!
//! Mounting a [`DevicesScreen`] spawns one task that owns the
//! [`SyncManager`]. Transport events and user intents are applied inside
//! that task one at a time, so the manager has a single mutator. Views
//! talk to it through a cloneable [`ScreenHandle`].
//!
//! # Examples
//!
//! ```no_run
//! use home_switches::config::BrokerConfig;
//! use home_switches::registry::DeviceRegistry;
//! use home_switches::screen::DevicesScreen;
//!
//! # async fn example() -> home_switches::Result<()> {
//! let config = BrokerConfig::builder()
//!     .host("broker.example.com")
//!     .credentials("user", "secret")
//!     .build()?;
//!
//! let screen = DevicesScreen::connect_mqtt(DeviceRegistry::home(), config);
//! let mut events = screen.subscribe();
//! tokio::spawn(async move {
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! });
//! let handle = screen.mount();
//!
//! handle.toggle("3").await?;
//! println!("{}", handle.snapshot());
//!
//! handle.unmount().await;
//! # Ok(())
//! # }
//! ```

mod handle;
mod snapshot;

pub use handle::ScreenHandle;
pub use snapshot::ScreenSnapshot;

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::config::BrokerConfig;
use crate::error::Result;
use crate::event::{ScreenEvent, SyncEvent};
use crate::manager::SyncManager;
use crate::protocol::{MqttTransport, Transport};
use crate::registry::{DeviceId, DeviceRegistry};

/// Capacity of the intent channel between handles and the screen task.
const INTENT_CHANNEL_CAPACITY: usize = 32;

/// Requests sent from a [`ScreenHandle`] to the screen task.
pub(crate) enum Intent {
    Toggle {
        id: DeviceId,
        reply: oneshot::Sender<Result<bool>>,
    },
    Unmount {
        reply: oneshot::Sender<()>,
    },
}

/// A devices screen that has not been mounted yet.
#[derive(Debug)]
pub struct DevicesScreen<T> {
    manager: SyncManager<T>,
    events: mpsc::Receiver<SyncEvent>,
}

impl<T> DevicesScreen<T>
where
    T: Transport + Send + 'static,
{
    /// Creates a screen over any transport and the receiver of its events.
    #[must_use]
    pub fn new(registry: DeviceRegistry, transport: T, events: mpsc::Receiver<SyncEvent>) -> Self {
        Self {
            manager: SyncManager::new(registry, transport),
            events,
        }
    }

    /// Subscribes to screen events before mounting, so the connect
    /// outcome cannot be missed.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ScreenEvent> {
        self.manager.subscribe()
    }

    /// Starts the connection attempt and spawns the screen task.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(self) -> ScreenHandle {
        let Self {
            mut manager,
            events,
        } = self;

        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CHANNEL_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(ScreenSnapshot::of(&manager));
        let event_bus = manager.event_bus().clone();

        tracing::debug!(devices = manager.registry().len(), "Mounting devices screen");
        manager.initialize();
        publish_snapshot(&snapshot_tx, &manager);

        tokio::spawn(run_screen(manager, events, intent_rx, snapshot_tx));

        ScreenHandle::new(intent_tx, snapshot_rx, event_bus)
    }
}

impl DevicesScreen<MqttTransport> {
    /// Creates a screen backed by a real MQTT connection.
    #[must_use]
    pub fn connect_mqtt(registry: DeviceRegistry, config: BrokerConfig) -> Self {
        let (transport, events) = MqttTransport::new(config);
        Self::new(registry, transport, events)
    }
}

/// The screen task: the single place where the manager is mutated.
async fn run_screen<T: Transport>(
    mut manager: SyncManager<T>,
    mut events: mpsc::Receiver<SyncEvent>,
    mut intents: mpsc::Receiver<Intent>,
    snapshot_tx: watch::Sender<ScreenSnapshot>,
) {
    let mut events_open = true;
    let mut unmount_reply = None;

    loop {
        tokio::select! {
            biased;

            event = events.recv(), if events_open => match event {
                Some(event) => manager.handle(event),
                None => {
                    tracing::debug!("Transport event channel closed");
                    events_open = false;
                }
            },

            intent = intents.recv() => match intent {
                Some(Intent::Toggle { id, reply }) => {
                    let result = manager.toggle(&id);
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "Toggle rejected");
                    }
                    let _ = reply.send(result);
                }
                Some(Intent::Unmount { reply }) => {
                    unmount_reply = Some(reply);
                    break;
                }
                None => {
                    tracing::debug!("All screen handles dropped");
                    break;
                }
            },
        }

        publish_snapshot(&snapshot_tx, &manager);
    }

    manager.teardown();
    publish_snapshot(&snapshot_tx, &manager);
    tracing::debug!("Devices screen unmounted");

    if let Some(reply) = unmount_reply {
        let _ = reply.send(());
    }
}

/// Updates the snapshot, notifying watchers only when something changed.
fn publish_snapshot<T: Transport>(
    snapshot_tx: &watch::Sender<ScreenSnapshot>,
    manager: &SyncManager<T>,
) {
    let next = ScreenSnapshot::of(manager);
    snapshot_tx.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}
