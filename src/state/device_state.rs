// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use chrono::{DateTime, Utc};

use crate::types::{ChannelId, PowerState, StatusInfo, ThingStatus};

use super::StateChange;

/// Last published state of a zeptrion device.
///
/// Channel states are `None` until the first successful status report.
/// A failed request never clears them, so the last known good values stay
/// visible while the device is offline.
///
/// # Examples
///
/// ```
/// use zeptrion_lib::state::DeviceState;
/// use zeptrion_lib::types::{ChannelId, PowerState, ThingStatus};
///
/// let mut state = DeviceState::new();
/// assert_eq!(state.status(), ThingStatus::Unknown);
///
/// state.set_channel(ChannelId::Two, PowerState::On);
/// assert_eq!(state.channel(ChannelId::Two), Some(PowerState::On));
/// assert_eq!(state.channel(ChannelId::One), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    channels: [Option<PowerState>; 2],
    status: StatusInfo,
    last_update: Option<DateTime<Utc>>,
}

impl DeviceState {
    /// Creates a new state with unknown channels and reachability.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Channels ==========

    /// Gets the power state of a channel.
    #[must_use]
    pub fn channel(&self, channel: ChannelId) -> Option<PowerState> {
        self.channels[channel.slot()]
    }

    /// Sets the power state of a channel.
    pub fn set_channel(&mut self, channel: ChannelId, state: PowerState) {
        self.channels[channel.slot()] = Some(state);
    }

    /// Returns all known channel states.
    #[must_use]
    pub fn all_channels(&self) -> Vec<(ChannelId, PowerState)> {
        ChannelId::ALL
            .iter()
            .filter_map(|ch| self.channel(*ch).map(|s| (*ch, s)))
            .collect()
    }

    /// Returns `true` if any channel is on.
    #[must_use]
    pub fn is_any_on(&self) -> bool {
        self.channels.iter().any(|s| matches!(s, Some(PowerState::On)))
    }

    // ========== Reachability ==========

    /// Gets the reachability status.
    #[must_use]
    pub fn status(&self) -> ThingStatus {
        self.status.status
    }

    /// Gets the reachability status with its detail.
    #[must_use]
    pub fn status_info(&self) -> &StatusInfo {
        &self.status
    }

    /// Sets the reachability status.
    pub fn set_status(&mut self, status: StatusInfo) {
        self.status = status;
    }

    /// Returns when the state last changed.
    #[must_use]
    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.last_update
    }

    // ========== Changes ==========

    /// Applies a state change.
    ///
    /// Returns `true` if the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let changed = match change {
            StateChange::Channel { channel, state } => {
                if self.channel(*channel) == Some(*state) {
                    false
                } else {
                    self.set_channel(*channel, *state);
                    true
                }
            }
            StateChange::Status(info) => {
                if &self.status == info {
                    false
                } else {
                    self.status = info.clone();
                    true
                }
            }
            StateChange::Batch(changes) => {
                let mut any = false;
                for nested in changes {
                    any |= self.apply(nested);
                }
                any
            }
        };
        if changed {
            self.last_update = Some(Utc::now());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_unknown() {
        let state = DeviceState::new();
        assert_eq!(state.status(), ThingStatus::Unknown);
        assert!(state.all_channels().is_empty());
        assert!(state.last_update().is_none());
    }

    #[test]
    fn apply_channel_change() {
        let mut state = DeviceState::new();
        let change = StateChange::channel(ChannelId::One, PowerState::On);

        assert!(state.apply(&change));
        assert_eq!(state.channel(ChannelId::One), Some(PowerState::On));
        assert!(state.last_update().is_some());

        // Applying same state returns false
        assert!(!state.apply(&change));
    }

    #[test]
    fn apply_status_change_with_detail() {
        let mut state = DeviceState::new();

        assert!(state.apply(&StateChange::offline("timed out")));
        assert_eq!(state.status(), ThingStatus::Offline);
        assert_eq!(state.status_info().detail.as_deref(), Some("timed out"));

        // Same status, different detail is a change
        assert!(state.apply(&StateChange::offline("HTTP 500")));
        assert!(!state.apply(&StateChange::offline("HTTP 500")));
    }

    #[test]
    fn apply_batch() {
        let mut state = DeviceState::new();
        let batch = StateChange::Batch(vec![
            StateChange::channel(ChannelId::One, PowerState::On),
            StateChange::channel(ChannelId::Two, PowerState::Off),
            StateChange::status(ThingStatus::Online),
        ]);

        assert!(state.apply(&batch));
        assert_eq!(
            state.all_channels(),
            vec![
                (ChannelId::One, PowerState::On),
                (ChannelId::Two, PowerState::Off)
            ]
        );
        assert!(state.status().is_online());
        assert!(state.is_any_on());
        assert!(!state.apply(&batch));
    }
}
