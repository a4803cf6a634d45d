// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Point-in-time view of the screen.

use std::fmt;

use crate::manager::SyncManager;
use crate::protocol::Transport;
use crate::registry::DeviceId;
use crate::state::{ConnectionState, DeviceRow};

/// Everything a view needs to draw the screen.
///
/// `Display` renders the plain-text form used by the terminal view:
///
/// ```text
/// Devices
///   1  Cooler   [OFF]
///   2  Fan      [ON]
/// (connected)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScreenSnapshot {
    /// Broker connection state.
    pub connection: ConnectionState,
    /// One row per device, in registry order.
    pub rows: Vec<DeviceRow>,
}

impl ScreenSnapshot {
    pub(crate) fn of<T: Transport>(manager: &SyncManager<T>) -> Self {
        Self {
            connection: manager.connection_state(),
            rows: manager.rows(),
        }
    }

    /// Returns the switch value of a device in this snapshot.
    #[must_use]
    pub fn is_on(&self, id: &DeviceId) -> Option<bool> {
        self.rows.iter().find(|row| &row.id == id).map(|row| row.on)
    }
}

impl fmt::Display for ScreenSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id_width = self.rows.iter().map(|r| r.id.as_str().len()).max().unwrap_or(0);
        let name_width = self.rows.iter().map(|r| r.name.len()).max().unwrap_or(0);

        writeln!(f, "Devices")?;
        for row in &self.rows {
            let switch = if row.on { "[ON]" } else { "[OFF]" };
            writeln!(
                f,
                "  {:<id_width$}  {:<name_width$}  {switch}",
                row.id.as_str(),
                row.name
            )?;
        }
        write!(f, "({})", self.connection)
    }
}
