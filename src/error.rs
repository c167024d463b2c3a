// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the zeptrion library.
//!
//! Failures fall into two buckets that both take a device offline:
//!
//! - [`Error::DeviceUnreachable`]: the request never produced a usable HTTP
//!   response (connection failure, timeout, non-200 status).
//! - [`Error::MalformedResponse`]: the device answered but the status report
//!   could not be decoded.
//!
//! All error types are `Clone` so that a single failed status fetch can be
//! handed to every caller that was waiting on it.

use std::sync::Arc;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error, Clone)]
pub enum Error {
    /// The device could not be reached or refused the request.
    #[error("device unreachable: {0}")]
    DeviceUnreachable(#[from] ProtocolError),

    /// The device answered with a payload that is not a valid status report.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] ParseError),

    /// A value could not be converted into a domain type.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// The controller configuration cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Returns true if this error should mark the device offline.
    #[must_use]
    pub fn is_reachability_failure(&self) -> bool {
        matches!(self, Self::DeviceUnreachable(_) | Self::MalformedResponse(_))
    }
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The channel identifier does not name a channel of the device.
    #[error("unsupported channel: {0}")]
    UnsupportedChannel(String),

    /// An invalid power state string was provided.
    #[error("invalid power state: {0}")]
    InvalidPowerState(String),

    /// An invalid command string was provided.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

/// Errors related to HTTP communication with the device.
#[derive(Debug, Error, Clone)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[source] Arc<reqwest::Error>),

    /// The device answered with a status other than 200.
    #[error("unexpected HTTP status {status}")]
    UnexpectedStatus {
        /// The status code returned by the device.
        status: u16,
    },

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl From<reqwest::Error> for ProtocolError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

/// Errors related to decoding device responses.
#[derive(Debug, Error, Clone)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[source] Arc<serde_json::Error>),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(Arc::new(err))
    }
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
