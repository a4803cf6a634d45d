// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! On/off mapping for every registered device.

use std::collections::HashMap;

use crate::registry::{DeviceId, DeviceRegistry};
use crate::types::PowerState;

/// Mapping from device identifier to its on/off state.
///
/// The key set is fixed at construction to the identifiers of the registry
/// and never grows or shrinks. Every device starts off.
///
/// # Examples
///
/// ```
/// use home_switches::registry::{DeviceId, DeviceRegistry};
/// use home_switches::state::DeviceStates;
/// use home_switches::types::PowerState;
///
/// let mut states = DeviceStates::new(&DeviceRegistry::home());
/// let fan = DeviceId::from("2");
/// assert_eq!(states.get(&fan), Some(PowerState::Off));
///
/// assert_eq!(states.set(&fan, PowerState::On), Some(PowerState::Off));
/// assert!(states.is_on(&fan));
///
/// // Unknown devices are never inserted.
/// assert_eq!(states.set(&DeviceId::from("99"), PowerState::On), None);
/// assert_eq!(states.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStates {
    states: HashMap<DeviceId, PowerState>,
}

impl DeviceStates {
    /// Creates the mapping with every registered device off.
    #[must_use]
    pub fn new(registry: &DeviceRegistry) -> Self {
        let states = registry
            .iter()
            .map(|device| (device.id().clone(), PowerState::Off))
            .collect();
        Self { states }
    }

    /// Returns the state of a device, or `None` if it is not registered.
    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<PowerState> {
        self.states.get(id).copied()
    }

    /// Returns `true` if the device is registered and on.
    #[must_use]
    pub fn is_on(&self, id: &DeviceId) -> bool {
        self.get(id).is_some_and(|state| state.is_on())
    }

    /// Updates a registered device and returns its previous state.
    ///
    /// Returns `None` without modifying anything if the device is unknown.
    pub fn set(&mut self, id: &DeviceId, state: PowerState) -> Option<PowerState> {
        self.states
            .get_mut(id)
            .map(|current| std::mem::replace(current, state))
    }

    /// Returns the number of tracked devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no devices are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Iterates over `(id, state)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&DeviceId, PowerState)> {
        self.states.iter().map(|(id, state)| (id, *state))
    }
}
