// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-related types for zeptrion actuators.
//!
//! This module provides the on/off state of a channel and the identifier
//! used to address one of the two channels of the device.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// Represents the power state of a channel.
///
/// # Examples
///
/// ```
/// use zeptrion_lib::types::PowerState;
///
/// assert_eq!(PowerState::On.as_str(), "ON");
/// assert_eq!(PowerState::Off.form_value(), "off");
/// assert_eq!(PowerState::from_level(3), PowerState::On);
/// assert_eq!(PowerState::from_level(0), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PowerState {
    /// Channel is off.
    Off,
    /// Channel is on.
    On,
}

impl PowerState {
    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::On => "ON",
        }
    }

    /// Returns the value sent in the `cmd` form field.
    #[must_use]
    pub const fn form_value(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::On => "on",
        }
    }

    /// Derives the power state from a reported channel level.
    ///
    /// Any level above zero means the channel is on.
    #[must_use]
    pub const fn from_level(level: i64) -> Self {
        if level > 0 { Self::On } else { Self::Off }
    }

    /// Returns true if the state is [`PowerState::On`].
    #[must_use]
    pub const fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "OFF" | "0" | "FALSE" => Ok(Self::Off),
            "ON" | "1" | "TRUE" => Ok(Self::On),
            _ => Err(ValueError::InvalidPowerState(s.to_string())),
        }
    }
}

impl From<bool> for PowerState {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Identifies one of the two channels of the actuator.
///
/// Channel identifiers arrive from the host as strings. Both the short
/// protocol form (`ch1`) and the long form (`channel1`) are accepted, as is
/// the bare channel number.
///
/// # Examples
///
/// ```
/// use zeptrion_lib::types::ChannelId;
///
/// let ch: ChannelId = "channel2".parse().unwrap();
/// assert_eq!(ch, ChannelId::Two);
/// assert_eq!(ch.number(), 2);
/// assert_eq!(ch.as_str(), "channel2");
///
/// assert!("channel3".parse::<ChannelId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ChannelId {
    /// Channel 1 (`ch1` in the status report).
    One,
    /// Channel 2 (`ch2` in the status report).
    Two,
}

impl ChannelId {
    /// Both channels, in report order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Returns the channel number (1 or 2).
    #[must_use]
    pub const fn number(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Returns the zero-based slot index.
    #[must_use]
    pub const fn slot(&self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    /// Returns the host-facing channel identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::One => "channel1",
            Self::Two => "channel2",
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChannelId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "channel1" | "ch1" | "1" => Ok(Self::One),
            "channel2" | "ch2" | "2" => Ok(Self::Two),
            _ => Err(ValueError::UnsupportedChannel(s.to_string())),
        }
    }
}
