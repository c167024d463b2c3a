// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command definitions.
//!
//! Two layers of commands exist:
//!
//! | Type | Direction | Purpose |
//! |------|-----------|---------|
//! | [`Command`] | host → controller | What the host asks for on a channel: on, off, or refresh |
//! | [`SwitchCommand`] | controller → device | The form-encoded control request sent over HTTP |
//!
//! # Examples
//!
//! ```
//! use zeptrion_lib::command::{Command, SwitchCommand};
//! use zeptrion_lib::types::{ChannelId, PowerState};
//!
//! let cmd: Command = "ON".parse().unwrap();
//! assert_eq!(cmd, Command::Set(PowerState::On));
//!
//! let switch = SwitchCommand::new(ChannelId::One, PowerState::On);
//! assert_eq!(switch.form_body(), "cmd=on");
//! ```

mod switch;

pub use switch::SwitchCommand;

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;
use crate::types::PowerState;

/// A command delivered by the host to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Switch the channel on or off.
    Set(PowerState),
    /// Re-read the device state without sending anything.
    Refresh,
}

impl Command {
    /// Creates a command to switch a channel on.
    #[must_use]
    pub const fn on() -> Self {
        Self::Set(PowerState::On)
    }

    /// Creates a command to switch a channel off.
    #[must_use]
    pub const fn off() -> Self {
        Self::Set(PowerState::Off)
    }

    /// Returns true if this is a refresh request.
    #[must_use]
    pub const fn is_refresh(&self) -> bool {
        matches!(self, Self::Refresh)
    }
}

impl From<PowerState> for Command {
    fn from(state: PowerState) -> Self {
        Self::Set(state)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(state) => write!(f, "{state}"),
            Self::Refresh => write!(f, "REFRESH"),
        }
    }
}

impl FromStr for Command {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("REFRESH") {
            return Ok(Self::Refresh);
        }
        s.parse::<PowerState>()
            .map(Self::Set)
            .map_err(|_| ValueError::InvalidCommand(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_from_str() {
        assert_eq!("on".parse::<Command>().unwrap(), Command::on());
        assert_eq!("OFF".parse::<Command>().unwrap(), Command::off());
        assert_eq!("refresh".parse::<Command>().unwrap(), Command::Refresh);
    }

    #[test]
    fn command_from_str_invalid() {
        let err = "dim".parse::<Command>().unwrap_err();
        assert_eq!(err, ValueError::InvalidCommand("dim".to_string()));
    }

    #[test]
    fn command_display() {
        assert_eq!(Command::on().to_string(), "ON");
        assert_eq!(Command::Refresh.to_string(), "REFRESH");
    }

    #[test]
    fn command_is_refresh() {
        assert!(Command::Refresh.is_refresh());
        assert!(!Command::from(PowerState::Off).is_refresh());
    }
}
