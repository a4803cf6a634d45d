// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Broker connection lifecycle.

use std::fmt;

/// State of the single broker connection owned by the sync manager.
///
/// ```text
/// Disconnected --initialize--> Connecting --success--> Connected
///      ^                           |                       |
///      +---------failure-----------+                       |
///      +------------------lost / teardown------------------+
/// ```
///
/// There is no retry edge: after a failure or a loss the connection stays
/// disconnected until the screen is mounted again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No connection and no attempt in progress.
    #[default]
    Disconnected,
    /// An attempt is in progress.
    Connecting,
    /// Connected and subscribed.
    Connected,
}

impl ConnectionState {
    /// Returns true if the connection is established.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns a short label for display.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disconnected() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
    }

    #[test]
    fn only_connected_is_connected() {
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Connecting.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
    }

    #[test]
    fn display_labels() {
        assert_eq!(ConnectionState::Connecting.to_string(), "connecting");
    }
}
