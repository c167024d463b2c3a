// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish device state.

use crate::state::StateChange;
use crate::subscription::SubscriptionId;
use crate::types::{ChannelId, PowerState, StatusInfo};

/// Trait for types that support state subscriptions.
///
/// Callbacks run on whichever worker task published the change, so they
/// should return quickly.
///
/// # Examples
///
/// ```no_run
/// use zeptrion_lib::DeviceSyncController;
/// use zeptrion_lib::subscription::Subscribable;
///
/// # fn example() -> zeptrion_lib::Result<()> {
/// let controller = DeviceSyncController::http("192.168.1.40").build()?;
///
/// let sub_id = controller.on_channel_changed(|channel, state| {
///     println!("{channel} is now {state}");
/// });
///
/// controller.on_status_changed(|status| {
///     println!("device is {status}");
/// });
///
/// controller.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to channel state publications.
    ///
    /// The callback receives the channel and its published power state. It is
    /// called for every reconciliation, even when the value did not change.
    fn on_channel_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ChannelId, PowerState) + Send + Sync + 'static;

    /// Subscribes to reachability publications.
    fn on_status_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusInfo) + Send + Sync + 'static;

    /// Subscribes to all state changes.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static;

    /// Removes a subscription.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
