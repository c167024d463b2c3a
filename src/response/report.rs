// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel scan report parsing.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{ChannelId, PowerState};

/// The reported level of a single channel.
///
/// The protocol transports the level as an integer; the on/off state is
/// derived on read so the raw value is never lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChannelLevel {
    val: i64,
}

impl ChannelLevel {
    /// Creates a channel level from a raw value.
    #[must_use]
    pub const fn new(val: i64) -> Self {
        Self { val }
    }

    /// Returns the raw level reported by the device.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.val
    }

    /// Returns the derived power state (`ON` when the level is above zero).
    #[must_use]
    pub const fn power_state(&self) -> PowerState {
        PowerState::from_level(self.val)
    }

    /// Returns true if the channel is on.
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.val > 0
    }
}

/// The device's status report for both channels.
///
/// The device answers a status request with:
///
/// ```json
/// { "ch1": { "val": 1 }, "ch2": { "val": 0 } }
/// ```
///
/// Both channel slots are required; a payload missing either one is rejected.
///
/// # Examples
///
/// ```
/// use zeptrion_lib::response::StatusReport;
/// use zeptrion_lib::types::{ChannelId, PowerState};
///
/// let report = StatusReport::parse(r#"{"ch1":{"val":1},"ch2":{"val":0}}"#).unwrap();
/// assert_eq!(report.power_state(ChannelId::One), PowerState::On);
/// assert_eq!(report.power_state(ChannelId::Two), PowerState::Off);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusReport {
    ch1: ChannelLevel,
    ch2: ChannelLevel,
}

impl StatusReport {
    /// Creates a report from the raw levels of both channels.
    #[must_use]
    pub const fn new(ch1: i64, ch2: i64) -> Self {
        Self {
            ch1: ChannelLevel::new(ch1),
            ch2: ChannelLevel::new(ch2),
        }
    }

    /// Parses a report from a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the body is not a valid report.
    pub fn parse(body: &str) -> Result<Self, ParseError> {
        serde_json::from_str(body).map_err(ParseError::from)
    }

    /// Returns the level of a channel.
    #[must_use]
    pub const fn channel(&self, channel: ChannelId) -> ChannelLevel {
        match channel {
            ChannelId::One => self.ch1,
            ChannelId::Two => self.ch2,
        }
    }

    /// Returns the derived power state of a channel.
    #[must_use]
    pub const fn power_state(&self, channel: ChannelId) -> PowerState {
        self.channel(channel).power_state()
    }
}
