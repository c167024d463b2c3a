// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `zeptrion_lib` - keeps a home-automation host in sync with a zeptrion
//! two-channel switch actuator over HTTP.
//!
//! The host sends per-channel commands (ON, OFF, REFRESH); the library
//! translates them into HTTP requests to the device, reads back the
//! device's status report, and publishes each channel's power state and the
//! device's reachability.
//!
//! # Features
//!
//! - **Switching**: `POST` with a form-encoded `cmd=on` / `cmd=off` body
//! - **Status reads**: `GET` of a JSON report `{"ch1":{"val":N},"ch2":{"val":N}}`
//! - **Caching**: one fetch per TTL (5 s by default), concurrent readers
//!   share a single in-flight request
//! - **Delayed refresh**: status re-read 500 ms after an accepted command
//! - **Reachability**: any failure marks the device `OFFLINE` with a reason,
//!   any successful read marks it `ONLINE`
//!
//! # Quick Start
//!
//! ```no_run
//! use zeptrion_lib::{Command, DeviceSyncController, Subscribable};
//!
//! #[tokio::main]
//! async fn main() -> zeptrion_lib::Result<()> {
//!     let controller = DeviceSyncController::http("192.168.1.40").build()?;
//!
//!     controller.on_channel_changed(|channel, state| {
//!         println!("{channel} is now {state}");
//!     });
//!     controller.on_status_changed(|status| {
//!         println!("device is {status}");
//!     });
//!
//!     // Publishes UNKNOWN, then probes the device
//!     controller.initialize().await.ok();
//!
//!     controller.handle_command("channel1", Command::on()).await;
//!     controller.handle_command("channel2", Command::Refresh).await;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Watching State
//!
//! ```no_run
//! use zeptrion_lib::DeviceSyncController;
//!
//! # async fn example() -> zeptrion_lib::Result<()> {
//! let controller = DeviceSyncController::http("192.168.1.40").build()?;
//! let mut rx = controller.watch_state();
//!
//! while rx.changed().await.is_ok() {
//!     let state = rx.borrow().clone();
//!     println!("{:?} {:?}", state.status(), state.all_channels());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod command;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod protocol;
pub mod reconciler;
pub mod response;
pub mod scheduler;
pub mod state;
pub mod subscription;
pub mod types;

pub use cache::{ExpiringCache, StatusCache};
pub use command::{Command, SwitchCommand};
pub use controller::{
    ControllerBuilder, ControllerConfig, DeviceSyncController, HttpControllerBuilder,
    StartupProbe,
};
pub use dispatcher::CommandDispatcher;
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use protocol::{HttpClient, HttpConfig, Protocol};
pub use reconciler::StateReconciler;
pub use response::StatusReport;
pub use scheduler::Scheduler;
pub use state::{DeviceState, StateChange};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{ChannelId, DeviceId, PowerState, StatusInfo, ThingStatus};
