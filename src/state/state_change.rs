// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! State changes are the units in which the controller publishes what it
//! learned about the device. They are applied to a
//! [`DeviceState`](super::DeviceState) and dispatched to subscribers.
//!
//! # Examples
//!
//! ```
//! use zeptrion_lib::state::{DeviceState, StateChange};
//! use zeptrion_lib::types::{ChannelId, PowerState, ThingStatus};
//!
//! let mut state = DeviceState::new();
//!
//! assert!(state.apply(&StateChange::channel(ChannelId::One, PowerState::On)));
//! assert!(state.apply(&StateChange::status(ThingStatus::Online)));
//!
//! // Applying the same change again reports no change
//! assert!(!state.apply(&StateChange::channel(ChannelId::One, PowerState::On)));
//! ```

use crate::types::{ChannelId, PowerState, StatusInfo, ThingStatus};

/// Represents a change in device state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// A channel's power state was published.
    Channel {
        /// The channel that changed.
        channel: ChannelId,
        /// The new power state.
        state: PowerState,
    },

    /// The device's reachability was published.
    Status(StatusInfo),

    /// Multiple changes at once.
    ///
    /// Used when a status report updates both channels and reachability.
    Batch(Vec<StateChange>),
}

impl StateChange {
    /// Creates a channel state change.
    #[must_use]
    pub fn channel(channel: ChannelId, state: PowerState) -> Self {
        Self::Channel { channel, state }
    }

    /// Creates a reachability change without detail.
    #[must_use]
    pub fn status(status: ThingStatus) -> Self {
        Self::Status(StatusInfo::new(status))
    }

    /// Creates an offline change carrying the failure reason.
    #[must_use]
    pub fn offline(detail: impl Into<String>) -> Self {
        Self::Status(StatusInfo::with_detail(ThingStatus::Offline, detail))
    }

    /// Returns true if this is a batch change.
    #[must_use]
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Returns the number of individual changes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Batch(changes) => changes.iter().map(Self::len).sum(),
            _ => 1,
        }
    }

    /// Returns true if this is an empty batch.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens nested batches into a list of individual changes.
    #[must_use]
    pub fn flatten(self) -> Vec<StateChange> {
        match self {
            Self::Batch(changes) => changes.into_iter().flat_map(Self::flatten).collect(),
            change => vec![change],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors() {
        assert_eq!(
            StateChange::channel(ChannelId::Two, PowerState::Off),
            StateChange::Channel {
                channel: ChannelId::Two,
                state: PowerState::Off
            }
        );
        assert_eq!(
            StateChange::offline("timeout"),
            StateChange::Status(StatusInfo::with_detail(ThingStatus::Offline, "timeout"))
        );
    }

    #[test]
    fn batch_len_counts_nested() {
        let batch = StateChange::Batch(vec![
            StateChange::channel(ChannelId::One, PowerState::On),
            StateChange::Batch(vec![
                StateChange::channel(ChannelId::Two, PowerState::Off),
                StateChange::status(ThingStatus::Online),
            ]),
        ]);
        assert!(batch.is_batch());
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.flatten().len(), 3);
    }

    #[test]
    fn empty_batch() {
        let batch = StateChange::Batch(vec![]);
        assert!(batch.is_empty());
        assert!(!StateChange::status(ThingStatus::Unknown).is_empty());
    }
}
