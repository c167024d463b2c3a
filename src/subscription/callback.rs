// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device state subscriptions.
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::StateChange;
use crate::types::{ChannelId, PowerState, StatusInfo};

/// Unique identifier for a subscription.
///
/// IDs are unique within a controller's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for channel state callbacks.
type ChannelCallback = Arc<dyn Fn(ChannelId, PowerState) + Send + Sync>;

/// Type alias for reachability callbacks.
type StatusCallback = Arc<dyn Fn(&StatusInfo) + Send + Sync>;

/// Type alias for generic state change callbacks.
type StateChangedCallback = Arc<dyn Fn(&StateChange) + Send + Sync>;

/// Registry for managing device subscription callbacks.
///
/// This is the publishing sink of a controller: every channel value and
/// reachability status the controller publishes is dispatched here.
///
/// # Thread Safety
///
/// The registry is fully thread-safe and can be accessed from multiple tasks
/// concurrently. Callbacks are wrapped in `Arc` so they can be cloned cheaply,
/// and are invoked after the registry's lock is released so a callback may
/// subscribe or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Channel state callbacks.
    channel_callbacks: RwLock<HashMap<SubscriptionId, ChannelCallback>>,
    /// Reachability callbacks.
    status_callbacks: RwLock<HashMap<SubscriptionId, StatusCallback>>,
    /// Generic state change callbacks (receives all changes).
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            channel_callbacks: RwLock::new(HashMap::new()),
            status_callbacks: RwLock::new(HashMap::new()),
            state_changed_callbacks: RwLock::new(HashMap::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for channel state publications.
    pub fn on_channel_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ChannelId, PowerState) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.channel_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for reachability publications.
    pub fn on_status_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusInfo) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.status_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for all state changes.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.channel_callbacks.write().remove(&id).is_some()
            || self.status_callbacks.write().remove(&id).is_some()
            || self.state_changed_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.channel_callbacks.write().clear();
        self.status_callbacks.write().clear();
        self.state_changed_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a state change to relevant callbacks.
    ///
    /// Callbacks are called synchronously in an arbitrary order.
    pub fn dispatch(&self, change: &StateChange) {
        let generic: Vec<_> = self.state_changed_callbacks.read().values().cloned().collect();
        for callback in generic {
            callback(change);
        }
        self.dispatch_specific(change);
    }

    fn dispatch_specific(&self, change: &StateChange) {
        match change {
            StateChange::Channel { channel, state } => {
                let callbacks: Vec<_> = self.channel_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(*channel, *state);
                }
            }
            StateChange::Status(info) => {
                let callbacks: Vec<_> = self.status_callbacks.read().values().cloned().collect();
                for callback in callbacks {
                    callback(info);
                }
            }
            StateChange::Batch(changes) => {
                for nested in changes {
                    self.dispatch_specific(nested);
                }
            }
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.channel_callbacks.read().len()
            + self.status_callbacks.read().len()
            + self.state_changed_callbacks.read().len()
    }

    /// Returns true if no callbacks are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("channel_callbacks", &self.channel_callbacks.read().len())
            .field("status_callbacks", &self.status_callbacks.read().len())
            .field(
                "state_changed_callbacks",
                &self.state_changed_callbacks.read().len(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use parking_lot::Mutex;

    use super::*;
    use crate::types::ThingStatus;

    #[test]
    fn subscription_ids_are_unique() {
        let registry = CallbackRegistry::new();
        let a = registry.on_channel_changed(|_, _| {});
        let b = registry.on_status_changed(|_| {});
        assert_ne!(a, b);
        assert_eq!(registry.callback_count(), 2);
    }

    #[test]
    fn channel_callback_receives_changes() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        registry.on_channel_changed(move |ch, state| sink.lock().push((ch, state)));

        registry.dispatch(&StateChange::channel(ChannelId::Two, PowerState::On));

        assert_eq!(*seen.lock(), vec![(ChannelId::Two, PowerState::On)]);
    }

    #[test]
    fn batch_is_dispatched_per_change() {
        let registry = CallbackRegistry::new();
        let channels = Arc::new(AtomicUsize::new(0));
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let generic = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&channels);
        registry.on_channel_changed(move |_, _| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        let s = Arc::clone(&statuses);
        registry.on_status_changed(move |info| s.lock().push(info.status));
        let g = Arc::clone(&generic);
        registry.on_state_changed(move |_| {
            g.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&StateChange::Batch(vec![
            StateChange::channel(ChannelId::One, PowerState::On),
            StateChange::channel(ChannelId::Two, PowerState::Off),
            StateChange::status(ThingStatus::Online),
        ]));

        assert_eq!(channels.load(Ordering::SeqCst), 2);
        assert_eq!(*statuses.lock(), vec![ThingStatus::Online]);
        // The generic callback sees the batch once
        assert_eq!(generic.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unsubscribe_removes_callback() {
        let registry = CallbackRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let id = registry.on_status_changed(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        registry.dispatch(&StateChange::status(ThingStatus::Offline));
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let id_slot = Arc::new(Mutex::new(None));
        let (r, slot) = (Arc::clone(&registry), Arc::clone(&id_slot));
        let id = registry.on_status_changed(move |_| {
            if let Some(id) = *slot.lock() {
                r.unsubscribe(id);
            }
        });
        *id_slot.lock() = Some(id);

        registry.dispatch(&StateChange::status(ThingStatus::Online));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_removes_everything() {
        let registry = CallbackRegistry::new();
        registry.on_channel_changed(|_, _| {});
        registry.on_state_changed(|_| {});
        registry.clear();
        assert!(registry.is_empty());
    }
}
