// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static device registry.
//!
//! The registry is injected into the sync manager as a value, so tests can
//! run the whole protocol against a synthetic device set.

mod device;
mod device_registry;

pub use device::{Device, DeviceId};
pub use device_registry::DeviceRegistry;
