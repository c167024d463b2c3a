// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Short-lived caching of device status.
//!
//! A burst of refresh triggers (a command on each channel, a host poll, an
//! explicit refresh) must not turn into a burst of HTTP requests. The
//! [`ExpiringCache`] keeps a single value for a fixed TTL and lets at most one
//! refill run at a time; [`StatusCache`] binds it to a device's status
//! request.

mod expiring;
mod status;

pub use expiring::{ExpiringCache, RefillFn, RefillFuture};
pub use status::StatusCache;
