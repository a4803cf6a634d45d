// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `home_switches` library.
//!
//! Most failures in this crate never leave the sync manager: connection
//! problems are turned into log lines and alerts where they happen. The
//! types below cover what does surface to callers: configuration loading,
//! transport calls, and toggle intents for devices that do not exist.

use thiserror::Error;

use crate::registry::DeviceId;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while talking to the broker.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while loading or validating configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No device with this identifier is registered.
    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    /// The screen task has stopped and no longer accepts intents.
    #[error("screen is no longer mounted")]
    ChannelClosed,
}

/// Errors related to broker communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The MQTT client rejected a request.
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The transport has no open connection.
    #[error("not connected")]
    NotConnected,
}

/// Errors related to configuration files and device registries.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the configuration file failed.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON for the expected shape.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The broker host is missing.
    #[error("broker host is required")]
    MissingHost,

    /// A device registry must contain at least one device.
    #[error("device registry is empty")]
    EmptyRegistry,

    /// Two devices share the same identifier.
    #[error("duplicate device id: {0}")]
    DuplicateId(String),

    /// Two devices share the same topic.
    #[error("duplicate device topic: {0}")]
    DuplicateTopic(String),

    /// A required device field is empty.
    #[error("device field `{0}` must not be empty")]
    EmptyField(&'static str),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
