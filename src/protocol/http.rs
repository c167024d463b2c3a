// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for zeptrion devices.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode, header};

use crate::command::SwitchCommand;
use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};
use crate::types::ChannelId;

/// Placeholder in the control path replaced with the channel number.
const CHANNEL_PLACEHOLDER: &str = "{channel}";

// ============================================================================
// HttpConfig - Endpoint configuration
// ============================================================================

/// Endpoint configuration for a zeptrion device.
///
/// The host may be a bare hostname or IP address, or a full URL prefix such
/// as `http://192.168.1.40/zrap/chctrl`. Control and status requests are sent
/// to the base URL followed by the respective path; both paths are empty by
/// default so the base URL is used for both operations.
///
/// The control path may contain `{channel}`, which is replaced with the
/// channel number (1 or 2).
///
/// # Examples
///
/// ```
/// use zeptrion_lib::protocol::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("192.168.1.40")
///     .with_port(8080)
///     .with_control_path("/zrap/chctrl/ch{channel}")
///     .with_status_path("/zrap/chscan")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://192.168.1.40:8080");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    host: String,
    port: u16,
    use_https: bool,
    timeout: Duration,
    control_path: String,
    status_path: String,
    credentials: Option<(String, String)>,
}

impl HttpConfig {
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;
    /// Default HTTPS port.
    pub const DEFAULT_HTTPS_PORT: u16 = 443;
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a new HTTP configuration for the specified host.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            use_https: false,
            timeout: Self::DEFAULT_TIMEOUT,
            control_path: String::new(),
            status_path: String::new(),
            credentials: None,
        }
    }

    /// Sets HTTP basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.credentials = Some((username.into(), password.into()));
        self
    }

    /// Sets a custom port.
    ///
    /// Ignored when the host is already a full URL.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Enables HTTPS.
    ///
    /// If port hasn't been explicitly set, it will be changed to 443.
    #[must_use]
    pub fn with_https(mut self) -> Self {
        self.use_https = true;
        if self.port == Self::DEFAULT_PORT {
            self.port = Self::DEFAULT_HTTPS_PORT;
        }
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the path appended to the base URL for switch commands.
    #[must_use]
    pub fn with_control_path(mut self, path: impl Into<String>) -> Self {
        self.control_path = path.into();
        self
    }

    /// Sets the path appended to the base URL for status requests.
    #[must_use]
    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = path.into();
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether HTTPS is enabled.
    #[must_use]
    pub fn use_https(&self) -> bool {
        self.use_https
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the control path.
    #[must_use]
    pub fn control_path(&self) -> &str {
        &self.control_path
    }

    /// Returns the status path.
    #[must_use]
    pub fn status_path(&self) -> &str {
        &self.status_path
    }

    /// Returns the credentials if set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        self.credentials
            .as_ref()
            .map(|(user, pass)| (user.as_str(), pass.as_str()))
    }

    /// Builds the base URL from this configuration.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            return host.to_string();
        }

        let scheme = if self.use_https { "https" } else { "http" };
        let port_suffix =
            if (self.use_https && self.port == 443) || (!self.use_https && self.port == 80) {
                String::new()
            } else {
                format!(":{}", self.port)
            };
        format!("{scheme}://{host}{port_suffix}")
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the host is empty, or
    /// `ProtocolError::Http` if the HTTP client cannot be created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let base_url = self.base_url();
        let client = Client::builder().timeout(self.timeout).build()?;

        Ok(HttpClient {
            base_url,
            control_path: self.control_path,
            status_path: self.status_path,
            timeout: self.timeout,
            credentials: self.credentials,
            client,
        })
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for a single zeptrion device.
///
/// Every request carries the configured timeout (10 seconds by default).
///
/// # Examples
///
/// ```no_run
/// use zeptrion_lib::command::SwitchCommand;
/// use zeptrion_lib::protocol::{HttpConfig, Protocol};
/// use zeptrion_lib::types::{ChannelId, PowerState};
///
/// # async fn example() -> Result<(), zeptrion_lib::error::ProtocolError> {
/// let client = HttpConfig::new("192.168.1.40").into_client()?;
/// client
///     .send_switch(SwitchCommand::new(ChannelId::One, PowerState::On))
///     .await?;
/// let report = client.fetch_status().await?;
/// println!("{}", report.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    control_path: String,
    status_path: String,
    timeout: Duration,
    credentials: Option<(String, String)>,
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default settings.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a switch command on the given channel.
    #[must_use]
    pub fn control_url(&self, channel: ChannelId) -> String {
        let path = self
            .control_path
            .replace(CHANNEL_PLACEHOLDER, &channel.number().to_string());
        format!("{}{path}", self.base_url)
    }

    /// Builds the URL for a status request.
    #[must_use]
    pub fn status_url(&self) -> String {
        format!("{}{}", self.base_url, self.status_path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some((user, pass)) => request.basic_auth(user, Some(pass)),
            None => request,
        }
    }

    /// Converts a transport error, separating timeouts and connect failures.
    #[allow(clippy::cast_possible_truncation)]
    fn map_error(&self, err: reqwest::Error) -> ProtocolError {
        if err.is_timeout() {
            ProtocolError::Timeout(self.timeout.as_millis() as u64)
        } else if err.is_connect() {
            ProtocolError::ConnectionFailed(err.to_string())
        } else {
            ProtocolError::from(err)
        }
    }

    fn check_status(status: StatusCode) -> Result<(), ProtocolError> {
        if status == StatusCode::OK {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedStatus {
                status: status.as_u16(),
            })
        }
    }
}

impl Protocol for HttpClient {
    async fn send_switch(&self, command: SwitchCommand) -> Result<(), ProtocolError> {
        let url = self.control_url(command.channel());
        let body = command.form_body();

        tracing::debug!(url = %url, body = %body, "Sending switch command");

        let response = self
            .authorize(self.client.post(&url))
            .header(header::CONTENT_TYPE, SwitchCommand::CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        Self::check_status(response.status())?;

        tracing::debug!(url = %url, "Switch command accepted");
        Ok(())
    }

    async fn fetch_status(&self) -> Result<CommandResponse, ProtocolError> {
        let url = self.status_url();

        tracing::debug!(url = %url, "Requesting status report");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        Self::check_status(response.status())?;

        let body = response.text().await.map_err(|e| self.map_error(e))?;

        tracing::debug!(body = %body, "Received status report");

        Ok(CommandResponse::new(body))
    }
}
