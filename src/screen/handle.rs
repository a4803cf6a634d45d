// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cloneable handle to a mounted screen.

use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::error::{Error, Result};
use crate::event::{EventBus, ScreenEvent};
use crate::registry::DeviceId;
use crate::state::DeviceRow;

use super::{Intent, ScreenSnapshot};

/// Handle used by views to read and drive a mounted screen.
///
/// Cloning is cheap. When the last handle is dropped the screen unmounts
/// by itself.
#[derive(Debug, Clone)]
pub struct ScreenHandle {
    intents: mpsc::Sender<Intent>,
    snapshot: watch::Receiver<ScreenSnapshot>,
    event_bus: EventBus,
}

impl ScreenHandle {
    pub(crate) fn new(
        intents: mpsc::Sender<Intent>,
        snapshot: watch::Receiver<ScreenSnapshot>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            intents,
            snapshot,
            event_bus,
        }
    }

    /// Flips a device and returns its new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unregistered device and
    /// [`Error::ChannelClosed`] once the screen is unmounted.
    pub async fn toggle(&self, id: impl Into<DeviceId>) -> Result<bool> {
        let (reply, response) = oneshot::channel();
        self.intents
            .send(Intent::Toggle {
                id: id.into(),
                reply,
            })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response.await.map_err(|_| Error::ChannelClosed)?
    }

    /// Tears the screen down and waits until the task has finished.
    ///
    /// Calling it on an already unmounted screen does nothing.
    pub async fn unmount(&self) {
        let (reply, done) = oneshot::channel();
        if self.intents.send(Intent::Unmount { reply }).await.is_ok() {
            let _ = done.await;
        }
    }

    /// Returns `true` while the screen task is running.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        !self.intents.is_closed()
    }

    /// Returns the latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ScreenSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Returns the latest rows.
    #[must_use]
    pub fn rows(&self) -> Vec<DeviceRow> {
        self.snapshot.borrow().rows.clone()
    }

    /// Returns a watch receiver that is notified after every change.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<ScreenSnapshot> {
        self.snapshot.clone()
    }

    /// Subscribes to screen events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ScreenEvent> {
        self.event_bus.subscribe()
    }
}
