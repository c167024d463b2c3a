// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device synchronization controller.
//!
//! [`DeviceSyncController`] is the entry point a host uses to drive one
//! zeptrion actuator. It ties together:
//!
//! - [`CommandDispatcher`] to send switch commands,
//! - [`StatusCache`] to fetch the status report at most once per TTL,
//! - [`StateReconciler`] to publish channel values and reachability.
//!
//! # Flow
//!
//! ```text
//! handle_command(ch, ON) ─► dispatch ─ ok ─► schedule(500 ms) ─► refresh
//!                                    └ err ─► OFFLINE
//! handle_command(ch, REFRESH) ───────────────────────────────► refresh
//! refresh ─► cache.get() ─ ok ─► reconcile (channels + ONLINE)
//!                        └ err ─► OFFLINE
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use zeptrion_lib::{Command, DeviceSyncController, Subscribable};
//!
//! # async fn example() -> zeptrion_lib::Result<()> {
//! let controller = DeviceSyncController::http("192.168.1.40").build()?;
//!
//! controller.on_channel_changed(|channel, state| {
//!     println!("{channel}: {state}");
//! });
//!
//! controller.initialize().await.ok();
//! controller.handle_command("channel1", Command::on()).await;
//! # Ok(())
//! # }
//! ```

mod builder;
mod config;

pub use builder::{ControllerBuilder, HttpControllerBuilder};
pub use config::{ControllerConfig, StartupProbe};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::StatusCache;
use crate::command::Command;
use crate::dispatcher::CommandDispatcher;
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig, Protocol};
use crate::reconciler::StateReconciler;
use crate::response::StatusReport;
use crate::scheduler::Scheduler;
use crate::state::{DeviceState, StateChange, StatePublisher};
use crate::subscription::{Subscribable, SubscriptionId};
use crate::types::{ChannelId, DeviceId, PowerState, StatusInfo, ThingStatus};

/// Keeps the published state of one two-channel actuator in sync with the
/// device.
///
/// The controller is cheap to clone; clones share the same cache, state,
/// and subscriptions.
///
/// Transport and decoding failures never surface from [`handle_command`]
/// or [`refresh`]: they turn into an `OFFLINE` status whose detail carries
/// the error message, and channel values keep their last known state.
///
/// [`handle_command`]: Self::handle_command
/// [`refresh`]: Self::refresh
pub struct DeviceSyncController<P: Protocol = HttpClient> {
    inner: Arc<Inner<P>>,
}

struct Inner<P: Protocol> {
    id: DeviceId,
    dispatcher: CommandDispatcher<P>,
    cache: StatusCache,
    reconciler: StateReconciler,
    publisher: StatePublisher,
    scheduler: Scheduler,
    refresh_delay: Duration,
    startup_probe: StartupProbe,
    disposed: AtomicBool,
}

impl<P: Protocol> Clone for DeviceSyncController<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<P: Protocol> DeviceSyncController<P> {
    /// Default delay between an accepted switch command and the refresh that
    /// picks up its effect.
    pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(500);

    pub(crate) fn new(
        protocol: P,
        scheduler: Scheduler,
        cache_ttl: Duration,
        refresh_delay: Duration,
        startup_probe: StartupProbe,
    ) -> Self {
        let protocol = Arc::new(protocol);
        let publisher = StatePublisher::new();
        Self {
            inner: Arc::new(Inner {
                id: DeviceId::new(),
                dispatcher: CommandDispatcher::new(Arc::clone(&protocol)),
                cache: StatusCache::new(protocol, cache_ttl),
                reconciler: StateReconciler::new(publisher.clone()),
                publisher,
                scheduler,
                refresh_delay,
                startup_probe,
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a builder for a controller using a custom transport.
    #[must_use]
    pub fn builder(protocol: P) -> ControllerBuilder<P> {
        ControllerBuilder::new(protocol)
    }

    /// Returns the identifier of this controller instance.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.inner.id
    }

    // ========== Lifecycle ==========

    /// Starts the controller.
    ///
    /// Sets the status to `UNKNOWN` before returning, then runs the startup
    /// probe on the worker pool to decide between `ONLINE` and `OFFLINE`.
    /// The returned handle completes when the probe is done.
    pub fn initialize(&self) -> JoinHandle<()> {
        self.inner
            .publisher
            .publish(&StateChange::status(ThingStatus::Unknown));

        let this = self.clone();
        self.inner.scheduler.execute(async move {
            match this.inner.startup_probe {
                StartupProbe::FetchStatus => {
                    tracing::debug!(device = %this.inner.id, "Probing device reachability");
                    this.refresh().await;
                }
                StartupProbe::AssumeReachable => {
                    tracing::debug!(device = %this.inner.id, "Assuming device is reachable");
                    this.inner
                        .publisher
                        .publish(&StateChange::status(ThingStatus::Online));
                }
            }
        })
    }

    /// Stops all further device traffic.
    ///
    /// Requests already in flight run to completion or time out. Refreshes
    /// that were scheduled but have not started yet are skipped, and later
    /// commands and refreshes are ignored. All subscriptions are removed.
    pub fn dispose(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        self.inner.publisher.callbacks().clear();
        tracing::debug!(device = %self.inner.id, "Controller disposed");
    }

    /// Returns true once [`dispose`](Self::dispose) has been called.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    // ========== Commands ==========

    /// Handles a command addressed to a channel by its host identifier.
    ///
    /// A refresh request re-reads the device state whatever the channel.
    /// Switch commands for identifiers that do not name a channel are
    /// ignored.
    pub async fn handle_command(&self, channel: &str, command: Command) {
        if command.is_refresh() {
            self.refresh().await;
            return;
        }

        match channel.parse::<ChannelId>() {
            Ok(channel) => self.handle_channel_command(channel, command).await,
            Err(e) => {
                tracing::debug!(device = %self.inner.id, error = %e, "Ignoring command");
            }
        }
    }

    /// Handles a command addressed to a known channel.
    ///
    /// A switch command is sent right away and awaited (bounded by the
    /// request timeout). If the device accepts it, a refresh is scheduled
    /// after the refresh delay; if not, the device is marked offline.
    pub async fn handle_channel_command(&self, channel: ChannelId, command: Command) {
        match command {
            Command::Refresh => self.refresh().await,
            Command::Set(state) => {
                self.switch(channel, state).await;
            }
        }
    }

    /// Switches a channel and returns the handle of the scheduled refresh.
    ///
    /// Returns `None` if the command failed or the controller is disposed.
    pub async fn switch(&self, channel: ChannelId, state: PowerState) -> Option<JoinHandle<()>> {
        if self.is_disposed() {
            tracing::debug!(device = %self.inner.id, "Ignoring command on disposed controller");
            return None;
        }

        match self.inner.dispatcher.dispatch(channel, state).await {
            Ok(()) => Some(self.schedule_refresh()),
            Err(e) => {
                self.mark_offline(&e);
                None
            }
        }
    }

    /// Fetches the status report (from the cache if still fresh) and
    /// publishes it.
    ///
    /// If the report cannot be obtained the device is marked offline and no
    /// channel value is touched. Does nothing once the controller is
    /// disposed.
    pub async fn refresh(&self) {
        if self.is_disposed() {
            tracing::debug!(device = %self.inner.id, "Skipping refresh on disposed controller");
            return;
        }

        let report = self
            .inner
            .cache
            .get()
            .await
            .map_err(|e| self.mark_offline(&e))
            .ok();

        let was_online = self.status().status.is_online();
        if self.inner.reconciler.reconcile(report.as_ref()).is_some() && !was_online {
            tracing::info!(device = %self.inner.id, "Device online");
        }
    }

    fn schedule_refresh(&self) -> JoinHandle<()> {
        let this = self.clone();
        self.inner
            .scheduler
            .schedule(self.inner.refresh_delay, async move { this.refresh().await })
    }

    fn mark_offline(&self, error: &Error) {
        let was_offline = self.status().status == ThingStatus::Offline;
        self.inner
            .publisher
            .publish(&StateChange::offline(error.to_string()));
        if !was_offline {
            tracing::info!(device = %self.inner.id, reason = %error, "Device offline");
        }
    }

    // ========== State ==========

    /// Returns a snapshot of the published device state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.inner.publisher.state()
    }

    /// Returns the current reachability with its detail.
    #[must_use]
    pub fn status(&self) -> StatusInfo {
        self.inner.publisher.state().status_info().clone()
    }

    /// Returns a receiver that is notified whenever the state changes.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<DeviceState> {
        self.inner.publisher.watch()
    }

    /// Returns the last report fetched from the device, regardless of age.
    #[must_use]
    pub fn last_report(&self) -> Option<StatusReport> {
        self.inner.cache.last_known()
    }

    /// Forces the next refresh to contact the device.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate();
    }
}

// ========== HTTP Entry Points ==========

impl DeviceSyncController<HttpClient> {
    /// Creates a builder for an HTTP controller from a host string.
    ///
    /// The host may be a bare address or a full URL prefix.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use zeptrion_lib::DeviceSyncController;
    ///
    /// # async fn example() -> zeptrion_lib::Result<()> {
    /// let controller = DeviceSyncController::http("192.168.1.40").build()?;
    /// controller.initialize().await.ok();
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn http(host: impl Into<String>) -> HttpControllerBuilder {
        HttpControllerBuilder::new(HttpConfig::new(host))
    }

    /// Creates a builder for an HTTP controller from an [`HttpConfig`].
    #[must_use]
    pub fn http_config(config: HttpConfig) -> HttpControllerBuilder {
        HttpControllerBuilder::new(config)
    }

    /// Creates a builder from a host-supplied [`ControllerConfig`].
    #[must_use]
    pub fn from_config(config: &ControllerConfig) -> HttpControllerBuilder {
        HttpControllerBuilder::from_config(config)
    }
}

impl<P: Protocol> Subscribable for DeviceSyncController<P> {
    fn on_channel_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(ChannelId, PowerState) + Send + Sync + 'static,
    {
        self.inner.publisher.callbacks().on_channel_changed(callback)
    }

    fn on_status_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StatusInfo) + Send + Sync + 'static,
    {
        self.inner.publisher.callbacks().on_status_changed(callback)
    }

    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.inner.publisher.callbacks().on_state_changed(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.publisher.callbacks().unsubscribe(id)
    }
}

impl<P: Protocol> std::fmt::Debug for DeviceSyncController<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceSyncController")
            .field("id", &self.inner.id)
            .field("status", &self.inner.publisher.state().status())
            .field("cache", &self.inner.cache)
            .field("refresh_delay", &self.inner.refresh_delay)
            .field("startup_probe", &self.inner.startup_probe)
            .finish_non_exhaustive()
    }
}
