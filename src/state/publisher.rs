// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Publishing of state changes to watchers and subscribers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::subscription::CallbackRegistry;

use super::{DeviceState, StateChange};

/// Sink that every published [`StateChange`] goes through.
///
/// A change is applied to the current [`DeviceState`] (watchers are only
/// woken if it actually changed) and then dispatched to every registered
/// callback, changed or not.
#[derive(Debug, Clone)]
pub struct StatePublisher {
    state_tx: Arc<watch::Sender<DeviceState>>,
    callbacks: Arc<CallbackRegistry>,
}

impl StatePublisher {
    /// Creates a publisher with an empty state and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(DeviceState::new());
        Self {
            state_tx: Arc::new(state_tx),
            callbacks: Arc::new(CallbackRegistry::new()),
        }
    }

    /// Publishes a change.
    ///
    /// Returns true if the device state changed.
    pub fn publish(&self, change: &StateChange) -> bool {
        let changed = self.state_tx.send_if_modified(|state| state.apply(change));
        self.callbacks.dispatch(change);
        changed
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state_tx.borrow().clone()
    }

    /// Creates a watch receiver for state updates.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<DeviceState> {
        self.state_tx.subscribe()
    }

    /// Returns the callback registry.
    #[must_use]
    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }
}

impl Default for StatePublisher {
    fn default() -> Self {
        Self::new()
    }
}
