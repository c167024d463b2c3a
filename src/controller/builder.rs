// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Controller builders.

use std::time::Duration;

use crate::cache::StatusCache;
use crate::controller::{ControllerConfig, DeviceSyncController, StartupProbe};
use crate::error::{Error, Result};
use crate::protocol::{HttpClient, HttpConfig, Protocol};
use crate::scheduler::Scheduler;

/// Tuning shared by both builders.
#[derive(Debug, Clone)]
struct Options {
    cache_ttl: Duration,
    refresh_delay: Duration,
    startup_probe: StartupProbe,
    scheduler: Option<Scheduler>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            cache_ttl: StatusCache::DEFAULT_TTL,
            refresh_delay: DeviceSyncController::<HttpClient>::DEFAULT_REFRESH_DELAY,
            startup_probe: StartupProbe::default(),
            scheduler: None,
        }
    }
}

impl Options {
    fn build<P: Protocol>(self, protocol: P) -> Result<DeviceSyncController<P>> {
        let scheduler = match self.scheduler {
            Some(scheduler) => scheduler,
            None => Scheduler::try_current()?,
        };
        Ok(DeviceSyncController::new(
            protocol,
            scheduler,
            self.cache_ttl,
            self.refresh_delay,
            self.startup_probe,
        ))
    }
}

/// Builder for controllers talking to the device over HTTP.
///
/// Created with `DeviceSyncController::http("host")`,
/// `DeviceSyncController::http_config(config)`, or
/// `DeviceSyncController::from_config(&config)`.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use zeptrion_lib::DeviceSyncController;
///
/// # async fn example() -> zeptrion_lib::Result<()> {
/// let controller = DeviceSyncController::http("192.168.1.40")
///     .with_timeout(Duration::from_secs(3))
///     .with_status_path("/zrap/chscan")
///     .with_refresh_delay(Duration::from_millis(800))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpControllerBuilder {
    config: HttpConfig,
    options: Options,
}

impl HttpControllerBuilder {
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self {
            config,
            options: Options::default(),
        }
    }

    pub(crate) fn from_config(config: &ControllerConfig) -> Self {
        let mut builder = Self::new(config.http_config());
        if let Some(ttl) = config.cache_ttl() {
            builder.options.cache_ttl = ttl;
        }
        if let Some(delay) = config.refresh_delay() {
            builder.options.refresh_delay = delay;
        }
        if let Some(probe) = config.startup_probe {
            builder.options.startup_probe = probe;
        }
        builder
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Sets HTTP basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config = self.config.with_credentials(username, password);
        self
    }

    /// Sets the path used for switch commands.
    #[must_use]
    pub fn with_control_path(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.with_control_path(path);
        self
    }

    /// Sets the path used for status requests.
    #[must_use]
    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.config = self.config.with_status_path(path);
        self
    }

    /// Sets how long a fetched status report stays fresh.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.options.cache_ttl = ttl;
        self
    }

    /// Sets the delay between a switch command and the follow-up refresh.
    #[must_use]
    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.options.refresh_delay = delay;
        self
    }

    /// Sets how `initialize` decides reachability.
    #[must_use]
    pub fn with_startup_probe(mut self, probe: StartupProbe) -> Self {
        self.options.startup_probe = probe;
        self
    }

    /// Runs background work on the given scheduler instead of the current
    /// runtime.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.options.scheduler = Some(scheduler);
        self
    }

    /// Builds the controller.
    ///
    /// No request is sent; call `initialize` to probe the device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if the host is empty, the HTTP client cannot be created, or no
    /// scheduler was given and there is no current Tokio runtime.
    pub fn build(self) -> Result<DeviceSyncController<HttpClient>> {
        let client = self
            .config
            .into_client()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
        tracing::debug!(base_url = %client.base_url(), "Building HTTP controller");
        self.options.build(client)
    }
}

/// Builder for controllers using a custom [`Protocol`].
///
/// Created with [`DeviceSyncController::builder`].
#[derive(Debug)]
pub struct ControllerBuilder<P> {
    protocol: P,
    options: Options,
}

impl<P: Protocol> ControllerBuilder<P> {
    pub(crate) fn new(protocol: P) -> Self {
        Self {
            protocol,
            options: Options::default(),
        }
    }

    /// Sets how long a fetched status report stays fresh.
    #[must_use]
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.options.cache_ttl = ttl;
        self
    }

    /// Sets the delay between a switch command and the follow-up refresh.
    #[must_use]
    pub fn with_refresh_delay(mut self, delay: Duration) -> Self {
        self.options.refresh_delay = delay;
        self
    }

    /// Sets how `initialize` decides reachability.
    #[must_use]
    pub fn with_startup_probe(mut self, probe: StartupProbe) -> Self {
        self.options.startup_probe = probe;
        self
    }

    /// Runs background work on the given scheduler.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: Scheduler) -> Self {
        self.options.scheduler = Some(scheduler);
        self
    }

    /// Builds the controller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if no scheduler was given and there is no current Tokio runtime.
    pub fn build(self) -> Result<DeviceSyncController<P>> {
        self.options.build(self.protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn http_builder_uses_defaults() {
        let controller = DeviceSyncController::http("192.168.1.40").build().unwrap();
        assert!(!controller.is_disposed());
        assert!(controller.last_report().is_none());
    }

    #[tokio::test]
    async fn http_builder_rejects_empty_host() {
        let err = DeviceSyncController::http("").build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(err.to_string().contains("host is required"));
        assert!(!err.is_reachability_failure());
    }

    #[test]
    fn build_outside_runtime_needs_scheduler() {
        let err = DeviceSyncController::http("192.168.1.40").build().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn build_with_explicit_scheduler() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let controller = DeviceSyncController::http("192.168.1.40")
            .with_scheduler(Scheduler::new(runtime.handle().clone()))
            .build();
        assert!(controller.is_ok());
    }

    #[test]
    fn from_config_applies_overrides() {
        let config = ControllerConfig {
            cache_ttl_ms: Some(1500),
            refresh_delay_ms: Some(100),
            startup_probe: Some(StartupProbe::AssumeReachable),
            ..ControllerConfig::new("192.168.1.40")
        };

        let builder = HttpControllerBuilder::from_config(&config);
        assert_eq!(builder.options.cache_ttl, Duration::from_millis(1500));
        assert_eq!(builder.options.refresh_delay, Duration::from_millis(100));
        assert_eq!(builder.options.startup_probe, StartupProbe::AssumeReachable);
    }
}
