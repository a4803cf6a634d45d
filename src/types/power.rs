// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power state carried in device topic payloads.

use std::fmt;

/// On/off state of a device as it travels over the broker.
///
/// Outgoing payloads are always the exact strings `ON` and `OFF`. Incoming
/// payloads are read leniently: anything that is not `ON` (ignoring case and
/// surrounding whitespace) counts as off.
///
/// # Examples
///
/// ```
/// use home_switches::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!(PowerState::from_payload(" on\n"), PowerState::On);
/// assert_eq!(PowerState::from_payload("maybe"), PowerState::Off);
/// assert!(PowerState::from(true).is_on());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    /// Device is off.
    #[default]
    Off,
    /// Device is on.
    On,
}

impl PowerState {
    /// Returns the payload string sent to the broker.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Parses a received payload.
    ///
    /// Never fails: unknown payloads map to [`PowerState::Off`].
    #[must_use]
    pub fn from_payload(payload: &str) -> Self {
        if payload.trim().eq_ignore_ascii_case("ON") {
            Self::On
        } else {
            Self::Off
        }
    }

    /// Returns `true` for [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    /// Returns the opposite state.
    #[must_use]
    pub const fn toggled(&self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

impl From<PowerState> for bool {
    fn from(value: PowerState) -> Self {
        value.is_on()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_strings_are_exact_case() {
        assert_eq!(PowerState::On.to_string(), "ON");
        assert_eq!(PowerState::Off.to_string(), "OFF");
    }

    #[test]
    fn from_payload_accepts_any_case_and_whitespace() {
        for payload in ["ON", "on", "On", "  oN  ", "ON\r\n"] {
            assert_eq!(PowerState::from_payload(payload), PowerState::On, "{payload:?}");
        }
    }

    #[test]
    fn from_payload_treats_everything_else_as_off() {
        for payload in ["OFF", "off", "", "maybe", "1", "true", "O N"] {
            assert_eq!(PowerState::from_payload(payload), PowerState::Off, "{payload:?}");
        }
    }

    #[test]
    fn toggled_flips() {
        assert_eq!(PowerState::On.toggled(), PowerState::Off);
        assert_eq!(PowerState::Off.toggled(), PowerState::On);
    }

    #[test]
    fn bool_conversions() {
        assert_eq!(PowerState::from(false), PowerState::Off);
        assert!(bool::from(PowerState::On));
        assert_eq!(PowerState::default(), PowerState::Off);
    }
}
