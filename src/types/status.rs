// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reachability status of a device.

use std::fmt;

/// Tri-state reachability of a device.
///
/// A device starts out [`Unknown`](Self::Unknown) until the first command,
/// status fetch, or startup probe decides whether it answers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub enum ThingStatus {
    /// Reachability has not been determined yet.
    #[default]
    Unknown,
    /// The device answered the last request.
    Online,
    /// The last request to the device failed.
    Offline,
}

impl ThingStatus {
    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Online => "ONLINE",
            Self::Offline => "OFFLINE",
        }
    }

    /// Returns true if the device is online.
    #[must_use]
    pub const fn is_online(&self) -> bool {
        matches!(self, Self::Online)
    }
}

impl fmt::Display for ThingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A reachability status together with an optional human-readable detail.
///
/// The detail carries the reason for an offline transition, for example the
/// display string of the failing request's error.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct StatusInfo {
    /// The reachability status.
    pub status: ThingStatus,
    /// Optional description of why the status was set.
    pub detail: Option<String>,
}

impl StatusInfo {
    /// Creates a status without detail.
    #[must_use]
    pub fn new(status: ThingStatus) -> Self {
        Self {
            status,
            detail: None,
        }
    }

    /// Creates a status with a detail message.
    #[must_use]
    pub fn with_detail(status: ThingStatus, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} ({detail})", self.status),
            None => write!(f, "{}", self.status),
        }
    }
}
