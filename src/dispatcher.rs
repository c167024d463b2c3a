// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sending channel switch commands to the device.

use std::sync::Arc;

use crate::command::SwitchCommand;
use crate::error::{Error, Result};
use crate::protocol::Protocol;
use crate::types::{ChannelId, PowerState};

/// Turns a channel command into a control request.
///
/// A successful dispatch only means the device accepted the request; the
/// channel's published value changes once a later status report shows it.
#[derive(Debug)]
pub struct CommandDispatcher<P> {
    protocol: Arc<P>,
}

impl<P: Protocol> CommandDispatcher<P> {
    /// Creates a dispatcher that sends through `protocol`.
    #[must_use]
    pub fn new(protocol: Arc<P>) -> Self {
        Self { protocol }
    }

    /// Sends `cmd=on` or `cmd=off` for the given channel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceUnreachable`] if the request failed, timed out,
    /// or was answered with a status other than 200.
    pub async fn dispatch(&self, channel: ChannelId, state: PowerState) -> Result<()> {
        let command = SwitchCommand::new(channel, state);
        tracing::debug!(channel = %channel, state = %state, "Dispatching switch command");

        self.protocol.send_switch(command).await.map_err(|e| {
            tracing::warn!(channel = %channel, error = %e, "Switch command failed");
            Error::DeviceUnreachable(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::error::ProtocolError;
    use crate::protocol::CommandResponse;

    #[derive(Default)]
    struct RecordingDevice {
        sent: Mutex<Vec<SwitchCommand>>,
        reject_with: Option<u16>,
    }

    impl Protocol for RecordingDevice {
        async fn send_switch(&self, command: SwitchCommand) -> std::result::Result<(), ProtocolError> {
            self.sent.lock().push(command);
            match self.reject_with {
                Some(status) => Err(ProtocolError::UnexpectedStatus { status }),
                None => Ok(()),
            }
        }

        async fn fetch_status(&self) -> std::result::Result<CommandResponse, ProtocolError> {
            Err(ProtocolError::ConnectionFailed("not scripted".to_string()))
        }
    }

    #[tokio::test]
    async fn dispatch_sends_switch_command() {
        let device = Arc::new(RecordingDevice::default());
        let dispatcher = CommandDispatcher::new(Arc::clone(&device));

        dispatcher
            .dispatch(ChannelId::Two, PowerState::On)
            .await
            .unwrap();

        let sent = device.sent.lock();
        assert_eq!(*sent, vec![SwitchCommand::new(ChannelId::Two, PowerState::On)]);
        assert_eq!(sent[0].form_body(), "cmd=on");
    }

    #[tokio::test]
    async fn rejected_command_is_device_unreachable() {
        let device = Arc::new(RecordingDevice {
            reject_with: Some(500),
            ..RecordingDevice::default()
        });
        let dispatcher = CommandDispatcher::new(device);

        let err = dispatcher
            .dispatch(ChannelId::One, PowerState::Off)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::DeviceUnreachable(ProtocolError::UnexpectedStatus { status: 500 })
        ));
    }
}
