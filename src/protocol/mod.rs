// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport for talking to zeptrion devices.
//!
//! The device exposes two operations:
//!
//! - a form-encoded `POST` that switches a channel (see [`SwitchCommand`])
//! - a `GET` that returns the channel scan report as JSON
//!
//! [`Protocol`] abstracts these so the synchronization logic can run against
//! the real [`HttpClient`] or an in-memory double.

mod http;

pub use http::{HttpClient, HttpConfig};

use std::future::Future;

use crate::command::SwitchCommand;
use crate::error::ProtocolError;

/// Response body returned by a status request.
#[derive(Debug, Clone)]
pub struct CommandResponse {
    /// The raw JSON response body.
    body: String,
}

impl CommandResponse {
    /// Creates a new response with the given body.
    #[must_use]
    pub fn new(body: String) -> Self {
        Self { body }
    }

    /// Returns the raw JSON response body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Trait for transports that can reach a zeptrion device.
///
/// Implementations must enforce their own request timeout and report it as
/// [`ProtocolError::Timeout`]. Any answer other than HTTP 200 is an error.
pub trait Protocol: Send + Sync + 'static {
    /// Sends a switch command to the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails, times out, or the device
    /// does not answer with 200.
    fn send_switch(
        &self,
        command: SwitchCommand,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;

    /// Fetches the raw status report from the device.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if the request fails, times out, or the device
    /// does not answer with 200.
    fn fetch_status(&self) -> impl Future<Output = Result<CommandResponse, ProtocolError>> + Send;
}
