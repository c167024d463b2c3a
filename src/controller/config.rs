// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-supplied controller configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::HttpConfig;

/// How [`initialize`](super::DeviceSyncController::initialize) decides
/// whether the device is reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StartupProbe {
    /// Fetch the status report once and publish it.
    #[default]
    FetchStatus,
    /// Mark the device online without contacting it.
    AssumeReachable,
}

/// Controller configuration as injected by a host, typically from JSON.
///
/// Only `hostname` is required. Durations are given in milliseconds.
///
/// # Examples
///
/// ```
/// use zeptrion_lib::controller::{ControllerConfig, StartupProbe};
///
/// let config = ControllerConfig::from_json(
///     r#"{"hostname": "192.168.1.40", "timeout_ms": 3000, "startup_probe": "assume_reachable"}"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.hostname, "192.168.1.40");
/// assert_eq!(config.startup_probe, Some(StartupProbe::AssumeReachable));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerConfig {
    /// Device host, IP address, or URL prefix.
    pub hostname: String,
    /// HTTP port; ignored when the hostname is a URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Basic authentication user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Basic authentication password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Path appended for switch commands; may contain `{channel}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_path: Option<String>,
    /// Path appended for status requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_path: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// How long a status report stays fresh, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_ttl_ms: Option<u64>,
    /// Delay between a switch command and the follow-up refresh.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_delay_ms: Option<u64>,
    /// Reachability probe run by `initialize`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_probe: Option<StartupProbe>,
}

impl ControllerConfig {
    /// Creates a configuration with only the hostname set.
    #[must_use]
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            ..Self::default()
        }
    }

    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the JSON is invalid, has
    /// unknown keys, or the hostname is empty.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can address a device.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the hostname is empty.
    pub fn validate(&self) -> Result<()> {
        if self.hostname.trim().is_empty() {
            return Err(Error::InvalidConfiguration(
                "hostname is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Builds the HTTP endpoint configuration.
    #[must_use]
    pub fn http_config(&self) -> HttpConfig {
        let mut config = HttpConfig::new(self.hostname.clone());
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(username) = &self.username {
            config = config.with_credentials(
                username.clone(),
                self.password.clone().unwrap_or_default(),
            );
        }
        if let Some(path) = &self.control_path {
            config = config.with_control_path(path.clone());
        }
        if let Some(path) = &self.status_path {
            config = config.with_status_path(path.clone());
        }
        if let Some(timeout) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(timeout));
        }
        config
    }

    /// Returns the cache TTL override, if any.
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_ms.map(Duration::from_millis)
    }

    /// Returns the refresh delay override, if any.
    #[must_use]
    pub fn refresh_delay(&self) -> Option<Duration> {
        self.refresh_delay_ms.map(Duration::from_millis)
    }
}
