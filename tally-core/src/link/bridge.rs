//! Host serial bridge
//!
//! The switcher client sends one hex encoded frame per line and gets one
//! hex encoded response line back for every command, well-formed or not.

use tally_protocol::hex_line::{decode_line, encode_line};
use tally_protocol::{LineAssembler, Message, MAX_FRAME_LEN};

use super::{LinkError, TallyLink};
use crate::status::StatusAlertEngine;
use crate::traits::SerialLine;

/// Hex digits of the largest frame
pub const BRIDGE_LINE_CAPACITY: usize = MAX_FRAME_LEN * 2;

/// Serial bytes consumed per poll, so a busy line cannot starve the loop
pub const MAX_BYTES_PER_POLL: usize = 256;

/// Command/response endpoint of the serial bridge
#[derive(Debug, Clone, Default)]
pub struct HostBridge {
    assembler: LineAssembler<BRIDGE_LINE_CAPACITY>,
    commands: u32,
}

impl HostBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands answered since startup
    pub fn command_count(&self) -> u32 {
        self.commands
    }

    /// Drop any partial command, e.g. after leaving host mode
    pub fn reset(&mut self) {
        self.assembler.reset();
    }

    /// Read pending serial bytes and answer every completed line
    ///
    /// Returns the number of responses written.
    pub fn poll<S: SerialLine>(
        &mut self,
        serial: &mut S,
        link: &mut TallyLink,
        engine: &mut StatusAlertEngine,
    ) -> Result<usize, LinkError> {
        let mut answered = 0;
        for _ in 0..MAX_BYTES_PER_POLL {
            let Some(byte) = serial.read_byte() else {
                break;
            };
            let response = match self.assembler.feed(byte) {
                Ok(None) => continue,
                Ok(Some(line)) => self.handle_line(&line, link, engine),
                Err(_) => {
                    warn!("Bridge line too long, discarded");
                    Message::Error
                }
            };
            Self::respond(serial, &response)?;
            answered += 1;
        }
        Ok(answered)
    }

    /// Decode and dispatch one command line (without its newline)
    pub fn handle_line(
        &mut self,
        line: &[u8],
        link: &mut TallyLink,
        engine: &mut StatusAlertEngine,
    ) -> Message {
        self.commands = self.commands.wrapping_add(1);

        let command = match decode_line(line) {
            Ok(bytes) => Message::decode(&bytes),
            Err(e) => {
                debug!("Bridge hex error: {}", e);
                return Message::Error;
            }
        };

        match command {
            Ok(Message::Test { target_mask }) => {
                link.queue_test(target_mask);
                Message::Ok
            }
            Ok(Message::Status { statuses }) => {
                engine.apply_authoritative(&statuses);
                Message::Ok
            }
            Ok(Message::Ping) => Message::Pong,
            Ok(_) => Message::Error,
            Err(e) => {
                debug!("Bridge frame error: {}", e);
                Message::Error
            }
        }
    }

    fn respond<S: SerialLine>(serial: &mut S, message: &Message) -> Result<(), LinkError> {
        let bytes = message.encode()?;
        let line = encode_line(&bytes)?;
        serial.write_all(&line)?;
        Ok(())
    }
}
