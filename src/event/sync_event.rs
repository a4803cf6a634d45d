// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events delivered by a transport to the sync manager.

/// Something that happened on the broker connection.
///
/// Transports translate their client library's callbacks into these
/// variants and hand them to [`SyncManager::handle`](crate::manager::SyncManager::handle).
/// Because they are plain values, tests can drive the manager without a
/// broker by constructing them directly.
///
/// # Examples
///
/// ```
/// use home_switches::event::SyncEvent;
///
/// let event = SyncEvent::message("home/fan", "ON");
/// assert!(matches!(event, SyncEvent::MessageArrived { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// The broker accepted the connection.
    ConnectSuccess,

    /// The connection attempt failed.
    ConnectFailure {
        /// Human-readable failure reason.
        reason: String,
    },

    /// A message arrived on a subscribed topic.
    MessageArrived {
        /// Topic the message was published to.
        topic: String,
        /// Payload decoded as UTF-8.
        payload: String,
    },

    /// An established connection went away.
    ConnectionLost {
        /// `0` for an orderly disconnect, anything else for an error.
        code: i32,
        /// Description of the loss.
        message: String,
    },
}

impl SyncEvent {
    /// Creates a connect failure event.
    #[must_use]
    pub fn connect_failure(reason: impl Into<String>) -> Self {
        Self::ConnectFailure {
            reason: reason.into(),
        }
    }

    /// Creates a message arrival event.
    #[must_use]
    pub fn message(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::MessageArrived {
            topic: topic.into(),
            payload: payload.into(),
        }
    }

    /// Creates a connection lost event.
    #[must_use]
    pub fn connection_lost(code: i32, message: impl Into<String>) -> Self {
        Self::ConnectionLost {
            code,
            message: message.into(),
        }
    }
}
