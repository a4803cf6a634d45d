// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker transports.
//!
//! The sync manager talks to the broker only through the [`Transport`]
//! trait. Calls are fire-and-forget: they queue a request and return
//! immediately, and whatever the broker answers comes back later as a
//! [`SyncEvent`](crate::event::SyncEvent).
//!
//! # Transports
//!
//! - [`MqttTransport`]: real broker connection built on `rumqttc`
//! - [`RecordingTransport`]: in-memory double that records every call

mod mqtt_transport;
mod recording;

pub use mqtt_transport::{MqttTransport, generate_client_id};
pub use recording::{RecordingTransport, TransportCall};

use crate::error::ProtocolError;
use crate::types::PowerState;

/// Outbound side of a broker connection.
///
/// None of these methods may block. Implementations queue work and report
/// asynchronous outcomes through their event channel.
pub trait Transport {
    /// Starts one connection attempt.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the attempt cannot even be started.
    fn connect(&mut self) -> Result<(), ProtocolError>;

    /// Subscribes to a device topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    fn subscribe(&self, topic: &str) -> Result<(), ProtocolError>;

    /// Publishes `ON`/`OFF` to a device topic.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    fn publish(&self, topic: &str, state: PowerState) -> Result<(), ProtocolError>;

    /// Closes the connection.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request cannot be queued.
    fn disconnect(&self) -> Result<(), ProtocolError>;
}
