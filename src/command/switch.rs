// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel switch request.

use crate::types::{ChannelId, PowerState};

/// Form field carrying the switch command.
const CMD_FIELD: &str = "cmd";

/// A control request that switches one channel on or off.
///
/// The device accepts the command as an `application/x-www-form-urlencoded`
/// POST body of the form `cmd=on` or `cmd=off`.
///
/// # Examples
///
/// ```
/// use zeptrion_lib::command::SwitchCommand;
/// use zeptrion_lib::types::{ChannelId, PowerState};
///
/// let cmd = SwitchCommand::new(ChannelId::Two, PowerState::Off);
/// assert_eq!(cmd.channel(), ChannelId::Two);
/// assert_eq!(cmd.form_body(), "cmd=off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SwitchCommand {
    channel: ChannelId,
    state: PowerState,
}

impl SwitchCommand {
    /// Content type of the request body.
    pub const CONTENT_TYPE: &'static str = "application/x-www-form-urlencoded";

    /// Creates a new switch command.
    #[must_use]
    pub const fn new(channel: ChannelId, state: PowerState) -> Self {
        Self { channel, state }
    }

    /// Returns the targeted channel.
    #[must_use]
    pub const fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Returns the requested power state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }

    /// Returns the form-encoded request body.
    #[must_use]
    pub fn form_body(&self) -> String {
        format!(
            "{}={}",
            urlencoding::encode(CMD_FIELD),
            urlencoding::encode(self.state.form_value())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_on() {
        let cmd = SwitchCommand::new(ChannelId::One, PowerState::On);
        assert_eq!(cmd.form_body(), "cmd=on");
    }

    #[test]
    fn form_body_off() {
        let cmd = SwitchCommand::new(ChannelId::Two, PowerState::Off);
        assert_eq!(cmd.form_body(), "cmd=off");
    }

    #[test]
    fn body_does_not_depend_on_channel() {
        let ch1 = SwitchCommand::new(ChannelId::One, PowerState::On);
        let ch2 = SwitchCommand::new(ChannelId::Two, PowerState::On);
        assert_eq!(ch1.form_body(), ch2.form_body());
        assert_ne!(ch1.channel(), ch2.channel());
    }
}
