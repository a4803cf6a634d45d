// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device descriptor and identifier types.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a registered device.
///
/// Identifiers are short strings chosen by whoever builds the registry
/// (the default home set uses `"1"` to `"4"`).
///
/// # Examples
///
/// ```
/// use home_switches::registry::DeviceId;
///
/// let id = DeviceId::from("1");
/// assert_eq!(id.as_str(), "1");
/// assert_eq!(id.to_string(), "1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates an identifier from any string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A switchable device bound to one broker topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    id: DeviceId,
    name: String,
    topic: String,
}

impl Device {
    /// Creates a device descriptor.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            topic: topic.into(),
        }
    }

    /// Returns the device identifier.
    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    /// Returns the display name shown next to the switch.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the topic the device listens and reports on.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }
}
