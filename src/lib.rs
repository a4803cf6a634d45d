// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `home_switches` - a devices screen kept in sync with an MQTT broker.
//!
//! A fixed list of devices (cooler, fan, light, heater by default) is shown
//! with one on/off switch each. Flipping a switch publishes `ON` or `OFF`
//! to the device topic; messages arriving on those topics move the switch.
//! Every fresh connection starts by forcing all devices `OFF`.
//!
//! # Layers
//!
//! - [`registry`]: the immutable, injected device list
//! - [`manager`]: [`SyncManager`], the state-sync protocol over a transport
//! - [`protocol`]: the [`Transport`] seam, with an MQTT implementation and
//!   a recording double
//! - [`screen`]: the mounted screen task and the handle views use
//!
//! # Quick Start
//!
//! ```no_run
//! use home_switches::config::AppConfig;
//! use home_switches::screen::DevicesScreen;
//!
//! #[tokio::main]
//! async fn main() -> home_switches::Result<()> {
//!     let config = AppConfig::load("config.json")?;
//!     let screen = DevicesScreen::connect_mqtt(config.registry()?, config.broker);
//!     let handle = screen.mount();
//!
//!     handle.toggle("1").await?;
//!     println!("{}", handle.snapshot());
//!
//!     handle.unmount().await;
//!     Ok(())
//! }
//! ```
//!
//! # Testing Without a Broker
//!
//! ```
//! use home_switches::event::SyncEvent;
//! use home_switches::protocol::RecordingTransport;
//! use home_switches::registry::{DeviceId, DeviceRegistry};
//! use home_switches::SyncManager;
//!
//! let mut manager = SyncManager::new(DeviceRegistry::home(), RecordingTransport::new());
//! manager.initialize();
//! manager.handle(SyncEvent::ConnectSuccess);
//! manager.handle(SyncEvent::message("home/heater", "on"));
//!
//! assert_eq!(manager.state(&DeviceId::from("4")), Some(true));
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod manager;
pub mod protocol;
pub mod registry;
pub mod screen;
pub mod state;
pub mod types;

pub use config::{AppConfig, BrokerConfig, BrokerConfigBuilder};
pub use error::{ConfigError, Error, ProtocolError, Result};
pub use event::{EventBus, ScreenEvent, SyncEvent};
pub use manager::SyncManager;
pub use protocol::{MqttTransport, RecordingTransport, Transport};
pub use registry::{Device, DeviceId, DeviceRegistry};
pub use screen::{DevicesScreen, ScreenHandle, ScreenSnapshot};
pub use state::{ConnectionState, DeviceRow, DeviceStates};
pub use types::PowerState;
