// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Rows handed to views.

use crate::registry::DeviceId;

/// One rendered line of the devices list: a name and its switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    /// Identifier used for toggle intents.
    pub id: DeviceId,
    /// Display name.
    pub name: String,
    /// Switch value.
    pub on: bool,
}
