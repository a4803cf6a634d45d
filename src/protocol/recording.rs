// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory transport that records calls.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ProtocolError;
use crate::types::PowerState;

use super::Transport;

/// A call made on a [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    /// [`Transport::connect`] was called.
    Connect,
    /// [`Transport::subscribe`] was called.
    Subscribe(String),
    /// [`Transport::publish`] was called.
    Publish {
        /// Destination topic.
        topic: String,
        /// Payload sent.
        state: PowerState,
    },
    /// [`Transport::disconnect`] was called.
    Disconnect,
}

/// Transport that never touches the network.
///
/// Every call is appended to a shared log, so a clone kept by a test sees
/// what the sync manager did with the original. Connection outcomes are
/// simulated by feeding [`SyncEvent`](crate::event::SyncEvent)s to the
/// manager directly.
///
/// # Examples
///
/// ```
/// use home_switches::protocol::{RecordingTransport, Transport, TransportCall};
/// use home_switches::types::PowerState;
///
/// let transport = RecordingTransport::new();
/// transport.publish("home/fan", PowerState::On).unwrap();
///
/// assert_eq!(
///     transport.calls(),
///     vec![TransportCall::Publish {
///         topic: "home/fan".to_string(),
///         state: PowerState::On,
///     }]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<TransportCall>>>,
    connect_error: Option<String>,
    publish_fails: bool,
}

impl RecordingTransport {
    /// Creates a transport whose calls all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes [`Transport::connect`] fail with the given reason.
    #[must_use]
    pub fn failing_connect(mut self, reason: impl Into<String>) -> Self {
        self.connect_error = Some(reason.into());
        self
    }

    /// Makes [`Transport::publish`] fail (the call is still recorded).
    #[must_use]
    pub fn failing_publish(mut self) -> Self {
        self.publish_fails = true;
        self
    }

    /// Returns every recorded call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<TransportCall> {
        self.calls.lock().clone()
    }

    /// Returns recorded publishes as `(topic, state)` pairs.
    #[must_use]
    pub fn publishes(&self) -> Vec<(String, PowerState)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                TransportCall::Publish { topic, state } => Some((topic.clone(), *state)),
                _ => None,
            })
            .collect()
    }

    /// Returns recorded subscription topics.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                TransportCall::Subscribe(topic) => Some(topic.clone()),
                _ => None,
            })
            .collect()
    }

    /// Forgets all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: TransportCall) {
        self.calls.lock().push(call);
    }
}

impl Transport for RecordingTransport {
    fn connect(&mut self) -> Result<(), ProtocolError> {
        self.record(TransportCall::Connect);
        match &self.connect_error {
            Some(reason) => Err(ProtocolError::ConnectionFailed(reason.clone())),
            None => Ok(()),
        }
    }

    fn subscribe(&self, topic: &str) -> Result<(), ProtocolError> {
        self.record(TransportCall::Subscribe(topic.to_string()));
        Ok(())
    }

    fn publish(&self, topic: &str, state: PowerState) -> Result<(), ProtocolError> {
        self.record(TransportCall::Publish {
            topic: topic.to_string(),
            state,
        });
        if self.publish_fails {
            return Err(ProtocolError::ConnectionFailed("publish rejected".to_string()));
        }
        Ok(())
    }

    fn disconnect(&self) -> Result<(), ProtocolError> {
        self.record(TransportCall::Disconnect);
        Ok(())
    }
}
