// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection and sync manager.
//!
//! [`SyncManager`] is the only component with any protocol logic: it turns
//! transport events into device state, and toggle intents into publishes.
//! It is synchronous and transport-agnostic, so the whole protocol can be
//! exercised with a [`RecordingTransport`](crate::protocol::RecordingTransport).

mod sync_manager;

pub use sync_manager::SyncManager;
