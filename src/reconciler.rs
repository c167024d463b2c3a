// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Applying status reports to published state.

use crate::response::StatusReport;
use crate::state::{StateChange, StatePublisher};
use crate::types::{ChannelId, ThingStatus};

/// Publishes the channel values and reachability carried by a status report.
#[derive(Debug, Clone)]
pub struct StateReconciler {
    publisher: StatePublisher,
}

impl StateReconciler {
    /// Creates a reconciler that publishes through `publisher`.
    #[must_use]
    pub fn new(publisher: StatePublisher) -> Self {
        Self { publisher }
    }

    /// Applies a report.
    ///
    /// With a report, both channels are published (ON when the level is above
    /// zero) and the device is marked online. Without one, nothing is
    /// published; the failing operation has already set the reachability.
    ///
    /// Returns the published change, if any.
    pub fn reconcile(&self, report: Option<&StatusReport>) -> Option<StateChange> {
        let report = report?;

        let mut changes: Vec<StateChange> = ChannelId::ALL
            .iter()
            .map(|ch| StateChange::channel(*ch, report.power_state(*ch)))
            .collect();
        changes.push(StateChange::status(ThingStatus::Online));

        let change = StateChange::Batch(changes);
        if self.publisher.publish(&change) {
            tracing::debug!(?report, "Reconciled device state");
        }
        Some(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;

    #[test]
    fn report_publishes_channels_and_online() {
        let publisher = StatePublisher::new();
        let reconciler = StateReconciler::new(publisher.clone());

        reconciler.reconcile(Some(&StatusReport::new(1, 0)));

        let state = publisher.state();
        assert_eq!(state.channel(ChannelId::One), Some(PowerState::On));
        assert_eq!(state.channel(ChannelId::Two), Some(PowerState::Off));
        assert_eq!(state.status(), ThingStatus::Online);
    }

    #[test]
    fn levels_map_to_power_state() {
        let publisher = StatePublisher::new();
        let reconciler = StateReconciler::new(publisher.clone());

        for (level, expected) in [
            (1, PowerState::On),
            (42, PowerState::On),
            (0, PowerState::Off),
            (-1, PowerState::Off),
            (-100, PowerState::Off),
        ] {
            reconciler.reconcile(Some(&StatusReport::new(level, level)));
            let state = publisher.state();
            assert_eq!(state.channel(ChannelId::One), Some(expected), "level {level}");
            assert_eq!(state.channel(ChannelId::Two), Some(expected), "level {level}");
        }
    }

    #[test]
    fn missing_report_publishes_nothing() {
        let publisher = StatePublisher::new();
        let reconciler = StateReconciler::new(publisher.clone());
        reconciler.reconcile(Some(&StatusReport::new(1, 1)));
        publisher.publish(&StateChange::offline("timed out"));

        assert!(reconciler.reconcile(None).is_none());

        let state = publisher.state();
        assert_eq!(state.channel(ChannelId::One), Some(PowerState::On));
        assert_eq!(state.status(), ThingStatus::Offline);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let publisher = StatePublisher::new();
        let reconciler = StateReconciler::new(publisher.clone());
        let report = StatusReport::new(0, 3);

        let first = reconciler.reconcile(Some(&report));
        let after_first = publisher.state();
        let second = reconciler.reconcile(Some(&report));

        assert_eq!(first, second);
        assert_eq!(publisher.state(), after_first);
    }
}
