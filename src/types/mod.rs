// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for zeptrion device control.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off state of a channel
//! - [`ChannelId`] - One of the two channels of the actuator
//! - [`ThingStatus`] - Online/Offline/Unknown reachability
//! - [`StatusInfo`] - Reachability plus an optional detail message
//! - [`DeviceId`] - Identifier of a controller instance

mod device_id;
mod power;
mod status;

pub use device_id::DeviceId;
pub use power::{ChannelId, PowerState};
pub use status::{StatusInfo, ThingStatus};
