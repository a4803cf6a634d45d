// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered, immutable set of devices.

use std::collections::HashSet;

use crate::error::ConfigError;

use super::{Device, DeviceId};

/// The fixed list of devices shown on the screen.
///
/// The registry is built once and never changes afterwards. Order is
/// preserved so the view can render rows in registry order. Identifiers and
/// topics are unique, which makes lookups in both directions unambiguous.
///
/// # Examples
///
/// ```
/// use home_switches::registry::DeviceRegistry;
///
/// let registry = DeviceRegistry::home();
/// assert_eq!(registry.len(), 4);
///
/// let fan = registry.by_topic("home/fan").unwrap();
/// assert_eq!(fan.name(), "Fan");
/// assert!(registry.by_topic("home/unknown").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Builds a registry from the given devices.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the list is empty, if any field is empty,
    /// or if two devices share an identifier or a topic.
    pub fn new(devices: Vec<Device>) -> Result<Self, ConfigError> {
        if devices.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        let mut ids = HashSet::new();
        let mut topics = HashSet::new();
        for device in &devices {
            if device.id().as_str().is_empty() {
                return Err(ConfigError::EmptyField("id"));
            }
            if device.topic().is_empty() {
                return Err(ConfigError::EmptyField("topic"));
            }
            if !ids.insert(device.id().as_str()) {
                return Err(ConfigError::DuplicateId(device.id().to_string()));
            }
            if !topics.insert(device.topic()) {
                return Err(ConfigError::DuplicateTopic(device.topic().to_string()));
            }
        }

        Ok(Self { devices })
    }

    /// Returns the default home set: cooler, fan, light and heater.
    #[must_use]
    pub fn home() -> Self {
        Self {
            devices: vec![
                Device::new("1", "Cooler", "home/cooler"),
                Device::new("2", "Fan", "home/fan"),
                Device::new("3", "Light", "home/light"),
                Device::new("4", "Heater", "home/heater"),
            ],
        }
    }

    /// Looks up the device reporting on `topic`.
    #[must_use]
    pub fn by_topic(&self, topic: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.topic() == topic)
    }

    /// Looks up a device by identifier.
    #[must_use]
    pub fn by_id(&self, id: &DeviceId) -> Option<&Device> {
        self.devices.iter().find(|device| device.id() == id)
    }

    /// Iterates devices in registry order.
    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.devices.iter()
    }

    /// Returns the number of devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Always `false` for a validated registry; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::home()
    }
}

impl<'a> IntoIterator for &'a DeviceRegistry {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_registry_order_and_topics() {
        let registry = DeviceRegistry::home();
        let topics: Vec<&str> = registry.iter().map(Device::topic).collect();
        assert_eq!(
            topics,
            ["home/cooler", "home/fan", "home/light", "home/heater"]
        );
        let names: Vec<&str> = registry.iter().map(Device::name).collect();
        assert_eq!(names, ["Cooler", "Fan", "Light", "Heater"]);
    }

    #[test]
    fn home_registry_passes_validation() {
        let home = DeviceRegistry::home();
        let rebuilt = DeviceRegistry::new(home.iter().cloned().collect()).unwrap();
        assert_eq!(rebuilt, home);
    }

    #[test]
    fn lookup_by_id() {
        let registry = DeviceRegistry::home();
        let light = registry.by_id(&DeviceId::from("3")).unwrap();
        assert_eq!(light.topic(), "home/light");
        assert!(registry.by_id(&DeviceId::from("42")).is_none());
    }

    #[test]
    fn topic_lookup_is_exact() {
        let registry = DeviceRegistry::home();
        assert!(registry.by_topic("home/cooler").is_some());
        assert!(registry.by_topic("HOME/COOLER").is_none());
        assert!(registry.by_topic("home/cooler/").is_none());
    }

    #[test]
    fn rejects_empty_list() {
        assert!(matches!(
            DeviceRegistry::new(Vec::new()),
            Err(ConfigError::EmptyRegistry)
        ));
    }

    #[test]
    fn rejects_duplicate_id() {
        let result = DeviceRegistry::new(vec![
            Device::new("1", "Cooler", "home/cooler"),
            Device::new("1", "Fan", "home/fan"),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateId(id)) if id == "1"));
    }

    #[test]
    fn rejects_duplicate_topic() {
        let result = DeviceRegistry::new(vec![
            Device::new("1", "Cooler", "home/shared"),
            Device::new("2", "Fan", "home/shared"),
        ]);
        assert!(matches!(result, Err(ConfigError::DuplicateTopic(t)) if t == "home/shared"));
    }

    #[test]
    fn rejects_empty_topic() {
        let result = DeviceRegistry::new(vec![Device::new("1", "Cooler", "")]);
        assert!(matches!(result, Err(ConfigError::EmptyField("topic"))));
    }
}
