// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Events emitted towards the view layer.

use crate::registry::DeviceId;
use crate::state::ConnectionState;

/// Title of the alert raised when the broker connection cannot be made.
pub const CONNECT_FAILED_TITLE: &str = "MQTT Connection Failed";

/// Notification for the view layer.
///
/// # Examples
///
/// ```
/// use home_switches::event::ScreenEvent;
/// use home_switches::registry::DeviceId;
///
/// let event = ScreenEvent::StateChanged {
///     device_id: DeviceId::from("1"),
///     on: true,
/// };
/// assert!(event.is_state_change());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenEvent {
    /// A device switch changed value.
    StateChanged {
        /// The device that changed.
        device_id: DeviceId,
        /// New value of the switch.
        on: bool,
    },

    /// The broker connection moved to a new state.
    ConnectionChanged {
        /// The new connection state.
        state: ConnectionState,
    },

    /// A message the user must see.
    Alert {
        /// Short title.
        title: String,
        /// Body text.
        message: String,
    },
}

impl ScreenEvent {
    /// Creates the alert shown when connecting fails.
    ///
    /// An empty reason is replaced with `Unknown error`.
    #[must_use]
    pub fn connect_failed(reason: &str) -> Self {
        let message = if reason.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            reason.to_string()
        };
        Self::Alert {
            title: CONNECT_FAILED_TITLE.to_string(),
            message,
        }
    }

    /// Returns `true` for [`ScreenEvent::StateChanged`].
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` for [`ScreenEvent::Alert`].
    #[must_use]
    pub fn is_alert(&self) -> bool {
        matches!(self, Self::Alert { .. })
    }
}
