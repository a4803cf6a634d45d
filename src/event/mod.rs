// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed events flowing in and out of the sync manager.
//!
//! - [`SyncEvent`]: transport → manager (connect outcome, inbound messages,
//!   connection loss)
//! - [`ScreenEvent`]: manager → view (switch changes, connection changes,
//!   alerts), fanned out by the [`EventBus`]

mod event_bus;
mod screen_event;
mod sync_event;

pub use event_bus::EventBus;
pub use screen_event::{CONNECT_FAILED_TITLE, ScreenEvent};
pub use sync_event::SyncEvent;
