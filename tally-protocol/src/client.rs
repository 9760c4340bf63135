//! Switcher-side session with a host unit over the serial bridge.
//!
//! The client owns no transport. It produces command lines to write and
//! consumes bytes read back, tracking the ping handshake.

use crate::frame::FrameError;
use crate::hex_line::{decode_line, encode_line, HexLine};
use crate::line::LineAssembler;
use crate::messages::{Message, StatusList, TEST_ALL};
use crate::status::CameraStatus;

/// Unterminated reply bytes kept before the buffer is flushed
pub const CLIENT_LINE_LIMIT: usize = 20;

/// How long to wait for `Pong` after connecting
pub const HANDSHAKE_TIMEOUT_MS: u32 = 500;

/// Handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    Disconnected,
    AwaitingPong { since_ms: u32 },
    Connected,
}

/// Outcome of a reply line or a timeout check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClientEvent {
    /// Handshake completed; the caller should send a fresh status
    Connected,
    /// Host accepted a command
    Acknowledged,
    /// Host rejected a command
    Rejected,
    /// No `Pong` within [`HANDSHAKE_TIMEOUT_MS`]
    HandshakeTimedOut,
    /// Reply that failed to decode or made no sense in this state
    Invalid,
}

/// Protocol side of a switcher client
#[derive(Debug, Clone)]
pub struct HostClient {
    state: LinkState,
    lines: LineAssembler<CLIENT_LINE_LIMIT>,
    rejected: u32,
}

impl Default for HostClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClient {
    pub const fn new() -> Self {
        Self {
            state: LinkState::Disconnected,
            lines: LineAssembler::new(),
            rejected: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == LinkState::Connected
    }

    /// Number of `Error` replies seen
    pub fn rejected_count(&self) -> u32 {
        self.rejected
    }

    /// Start the handshake. Returns the `Ping` line to write.
    pub fn connect(&mut self, now_ms: u32) -> Result<HexLine, FrameError> {
        self.lines.reset();
        self.state = LinkState::AwaitingPong { since_ms: now_ms };
        command_line(&Message::Ping)
    }

    /// Transport closed or failed
    pub fn disconnect(&mut self) {
        self.lines.reset();
        self.state = LinkState::Disconnected;
    }

    /// Check the handshake deadline
    pub fn poll(&mut self, now_ms: u32) -> Option<ClientEvent> {
        match self.state {
            LinkState::AwaitingPong { since_ms }
                if now_ms.wrapping_sub(since_ms) >= HANDSHAKE_TIMEOUT_MS =>
            {
                self.disconnect();
                Some(ClientEvent::HandshakeTimedOut)
            }
            _ => None,
        }
    }

    /// Feed one byte read from the host
    pub fn feed(&mut self, byte: u8) -> Option<ClientEvent> {
        match self.lines.feed(byte) {
            Ok(Some(line)) => Some(self.handle_line(&line)),
            Ok(None) => None,
            // Overlong garbage, nothing to report
            Err(_) => None,
        }
    }

    /// Interpret one reply line
    pub fn handle_line(&mut self, line: &[u8]) -> ClientEvent {
        let message = match decode_line(line) {
            Ok(bytes) => match Message::decode(&bytes) {
                Ok(message) => message,
                Err(_) => return ClientEvent::Invalid,
            },
            Err(_) => return ClientEvent::Invalid,
        };

        match message {
            Message::Pong => match self.state {
                LinkState::AwaitingPong { .. } => {
                    self.state = LinkState::Connected;
                    ClientEvent::Connected
                }
                _ => ClientEvent::Invalid,
            },
            Message::Ok => ClientEvent::Acknowledged,
            Message::Error => {
                self.rejected = self.rejected.saturating_add(1);
                ClientEvent::Rejected
            }
            _ => ClientEvent::Invalid,
        }
    }

    /// Status command for a switcher with `input_count` external inputs,
    /// given its 1-based preview and program inputs
    pub fn status_command(
        &self,
        input_count: u8,
        preview: Option<u8>,
        program: Option<u8>,
    ) -> Result<HexLine, FrameError> {
        command_line(&status_from_switcher(input_count, preview, program))
    }

    /// Test command addressed to every unit
    pub fn test_command(&self) -> Result<HexLine, FrameError> {
        self.test_command_for(TEST_ALL)
    }

    /// Test command for the slots in `target_mask`
    pub fn test_command_for(&self, target_mask: u8) -> Result<HexLine, FrameError> {
        command_line(&Message::Test { target_mask })
    }
}

/// Build a status message from switcher selections
pub fn status_from_switcher(input_count: u8, preview: Option<u8>, program: Option<u8>) -> Message {
    let mut statuses = StatusList::new();
    for input in 1..=input_count {
        if statuses
            .push(CameraStatus::for_input(input, preview, program))
            .is_err()
        {
            break;
        }
    }
    Message::Status { statuses }
}

fn command_line(message: &Message) -> Result<HexLine, FrameError> {
    let bytes = message.encode()?;
    encode_line(&bytes).map_err(|_| FrameError::BufferTooSmall)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_line(client: &mut HostClient, line: &[u8]) -> Option<ClientEvent> {
        let mut event = None;
        for &byte in line {
            if let Some(e) = client.feed(byte) {
                event = Some(e);
            }
        }
        event
    }

    #[test]
    fn test_connect_sends_ping() {
        let mut client = HostClient::new();
        let line = client.connect(0).unwrap();
        assert_eq!(&line[..], b"0403fd87\n");
        assert_eq!(client.state(), LinkState::AwaitingPong { since_ms: 0 });
    }

    #[test]
    fn test_pong_completes_handshake() {
        let mut client = HostClient::new();
        client.connect(100).unwrap();
        assert_eq!(feed_line(&mut client, b"0404f807\n"), Some(ClientEvent::Connected));
        assert!(client.is_connected());
        assert_eq!(client.poll(10_000), None);
    }

    #[test]
    fn test_unsolicited_pong_is_invalid() {
        let mut client = HostClient::new();
        assert_eq!(feed_line(&mut client, b"0404f807\n"), Some(ClientEvent::Invalid));
        assert!(!client.is_connected());
    }

    #[test]
    fn test_handshake_timeout() {
        let mut client = HostClient::new();
        client.connect(1_000).unwrap();
        assert_eq!(client.poll(1_499), None);
        assert_eq!(client.poll(1_500), Some(ClientEvent::HandshakeTimedOut));
        assert_eq!(client.state(), LinkState::Disconnected);
    }

    #[test]
    fn test_error_reply_counted() {
        let mut client = HostClient::new();
        assert_eq!(feed_line(&mut client, b"04ff5587\n"), Some(ClientEvent::Rejected));
        assert_eq!(feed_line(&mut client, b"0400ff87\n"), Some(ClientEvent::Acknowledged));
        assert_eq!(client.rejected_count(), 1);
    }

    #[test]
    fn test_corrupt_reply_invalid() {
        let mut client = HostClient::new();
        assert_eq!(feed_line(&mut client, b"0400ff88\n"), Some(ClientEvent::Invalid));
        assert_eq!(feed_line(&mut client, b"xyz\n"), Some(ClientEvent::Invalid));
    }

    #[test]
    fn test_overlong_garbage_flushed() {
        let mut client = HostClient::new();
        client.connect(0).unwrap();
        assert_eq!(feed_line(&mut client, &[b'a'; 30]), None);
        assert_eq!(feed_line(&mut client, b"\n0404f807\n"), Some(ClientEvent::Connected));
    }

    #[test]
    fn test_status_from_switcher() {
        let msg = status_from_switcher(4, Some(1), Some(3));
        assert_eq!(
            msg,
            Message::status(&[
                CameraStatus::Preview,
                CameraStatus::Standby,
                CameraStatus::Program,
                CameraStatus::Standby,
            ])
        );

        let client = HostClient::new();
        let line = client.status_command(4, Some(1), Some(3)).unwrap();
        let bytes = decode_line(&line[..line.len() - 1]).unwrap();
        assert_eq!(Message::decode(&bytes).unwrap(), msg);
    }

    #[test]
    fn test_test_command() {
        let client = HostClient::new();
        let line = client.test_command().unwrap();
        assert_eq!(&line[..], b"0501ff5181\n");
    }
}
