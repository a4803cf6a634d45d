// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory state rendered by the view layer.
//!
//! - [`DeviceStates`]: on/off per registered device
//! - [`ConnectionState`]: lifecycle of the broker connection
//! - [`DeviceRow`]: what the view draws for one device

mod connection;
mod device_row;
mod device_states;

pub use connection::ConnectionState;
pub use device_row::DeviceRow;
pub use device_states::DeviceStates;
