// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state management types.
//!
//! [`DeviceState`] holds the last published channel values and reachability
//! of a device, while [`StateChange`] represents individual updates applied
//! to it. [`StatePublisher`] applies changes and fans them out to watchers
//! and subscribers.
//!
//! # Examples
//!
//! ```
//! use zeptrion_lib::state::{DeviceState, StateChange};
//! use zeptrion_lib::types::{ChannelId, PowerState};
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::channel(ChannelId::One, PowerState::On));
//!
//! assert_eq!(state.channel(ChannelId::One), Some(PowerState::On));
//! ```

mod device_state;
mod publisher;
mod state_change;

pub use device_state::DeviceState;
pub use publisher::StatePublisher;
pub use state_change::StateChange;
