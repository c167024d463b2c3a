// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status report cache backed by a device transport.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ExpiringCache, RefillFuture};
use crate::error::{Error, Result};
use crate::protocol::Protocol;
use crate::response::StatusReport;

/// Coalesced, TTL-bounded view of a device's status report.
///
/// Wraps an [`ExpiringCache`] whose refill performs one status request
/// through the device's [`Protocol`] and decodes the body into a
/// [`StatusReport`].
pub struct StatusCache {
    inner: ExpiringCache<StatusReport>,
}

impl StatusCache {
    /// Default time-to-live of a cached report.
    pub const DEFAULT_TTL: Duration = Duration::from_secs(5);

    /// Creates an empty status cache that fetches through `protocol`.
    pub fn new<P: Protocol>(protocol: Arc<P>, ttl: Duration) -> Self {
        let inner = ExpiringCache::new(ttl, move || -> RefillFuture<StatusReport> {
            let protocol = Arc::clone(&protocol);
            Box::pin(async move { fetch_report(protocol.as_ref()).await })
        });
        Self { inner }
    }

    /// Returns the current report, fetching a new one if the cached report
    /// is older than the TTL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnreachable`] if the request failed and
    /// [`Error::MalformedResponse`] if the body was not a valid report.
    pub async fn get(&self) -> Result<StatusReport> {
        self.inner.get().await
    }

    /// Returns the last successfully fetched report, regardless of age.
    #[must_use]
    pub fn last_known(&self) -> Option<StatusReport> {
        self.inner.peek()
    }

    /// Returns true if the next [`get`](Self::get) will contact the device.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.inner.is_expired()
    }

    /// Forces the next [`get`](Self::get) to contact the device.
    pub fn invalidate(&self) {
        self.inner.invalidate();
    }

    /// Returns the time-to-live of cached reports.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.inner.ttl()
    }
}

impl std::fmt::Debug for StatusCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusCache")
            .field("inner", &self.inner)
            .finish()
    }
}

async fn fetch_report<P: Protocol>(protocol: &P) -> Result<StatusReport> {
    let response = match protocol.fetch_status().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "Status request failed");
            return Err(Error::DeviceUnreachable(e));
        }
    };

    match StatusReport::parse(response.body()) {
        Ok(report) => Ok(report),
        Err(e) => {
            tracing::error!(error = %e, body = %response.body(), "Malformed status report");
            Err(Error::MalformedResponse(e))
        }
    }
}
