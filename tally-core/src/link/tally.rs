//! Tally link over the broadcast radio

use heapless::String;
use tally_protocol::messages::{MSG_STATUS, MSG_TEST};
use tally_protocol::{FrameError, Message};

use super::LinkError;
use crate::config::{Mode, MESSAGE_INTERVAL_MS};
use crate::status::StatusAlertEngine;
use crate::traits::RadioTx;

/// Longest diagnostic note kept for the display
pub const MAX_NOTE_LEN: usize = 24;

/// Host broadcast schedule and camera receive handling
///
/// A fleet assumes exactly one host. Frames are not attributed to a sender,
/// so two hosts would overwrite each other's snapshots.
#[derive(Debug, Clone, Default)]
pub struct TallyLink {
    /// Test mask waiting for the next broadcast slot
    pending_test: Option<u8>,
    last_sent_ms: u32,
    last_received_ms: Option<u32>,
    note: String<MAX_NOTE_LEN>,
}

impl TallyLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a test alert to `target_mask` in the next broadcast slot
    ///
    /// A second request before the slot replaces the first.
    pub fn queue_test(&mut self, target_mask: u8) {
        debug!("Test queued for mask {=u8:#x}", target_mask);
        self.pending_test = Some(target_mask);
    }

    pub fn pending_test(&self) -> Option<u8> {
        self.pending_test
    }

    /// Time of the last accepted frame
    pub fn last_received_ms(&self) -> Option<u32> {
        self.last_received_ms
    }

    /// Last receive diagnostic, empty if none
    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn clear_note(&mut self) {
        self.note.clear();
    }

    fn set_note(&mut self, text: &str) {
        self.note.clear();
        let _ = self.note.push_str(text);
    }

    /// Message to broadcast now, if the interval has elapsed
    ///
    /// A queued test takes the slot and opens the host's own test window;
    /// otherwise the status snapshot is sent.
    pub fn due_message(&mut self, now_ms: u32, engine: &mut StatusAlertEngine) -> Option<Message> {
        if now_ms.wrapping_sub(self.last_sent_ms) <= MESSAGE_INTERVAL_MS {
            return None;
        }
        self.last_sent_ms = now_ms;

        match self.pending_test.take() {
            Some(target_mask) => {
                engine.start_test(now_ms);
                Some(Message::Test { target_mask })
            }
            None => Some(Message::status(engine.statuses().as_slice())),
        }
    }

    /// Whiten and broadcast one message
    pub fn broadcast<R: RadioTx>(&self, radio: &mut R, message: &Message) -> Result<(), LinkError> {
        let bytes = message.encode_radio()?;
        radio.broadcast(&bytes)?;
        Ok(())
    }

    /// Host side: broadcast whatever is due
    ///
    /// Returns true if a frame was handed to the radio.
    pub fn poll_broadcast<R: RadioTx>(
        &mut self,
        now_ms: u32,
        engine: &mut StatusAlertEngine,
        radio: &mut R,
    ) -> Result<bool, LinkError> {
        match self.due_message(now_ms, engine) {
            Some(message) => {
                self.broadcast(radio, &message)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Handle one received radio frame
    ///
    /// A host ignores all frames. A camera applies `Test` and `Status` and
    /// stamps the receive time of every frame it accepts. Corrupt frames
    /// leave a short note for the display.
    pub fn receive(
        &mut self,
        raw: &[u8],
        now_ms: u32,
        mode: Mode,
        engine: &mut StatusAlertEngine,
    ) -> Result<Option<Message>, LinkError> {
        if mode.is_host() {
            return Ok(None);
        }

        let message = match Message::decode_radio(raw) {
            Ok(message) => message,
            Err(e) => {
                match e {
                    FrameError::CrcMismatch => self.set_note("CRC failed"),
                    FrameError::InvalidLength { msg_type: MSG_TEST } => self.set_note("Invalid len"),
                    FrameError::InvalidLength {
                        msg_type: MSG_STATUS,
                    } => self.set_note("Invalid status"),
                    _ => {}
                }
                trace!("Radio frame dropped: {}", e);
                return Err(e.into());
            }
        };

        match &message {
            Message::Test { target_mask } => {
                if mode.test_bit().is_some_and(|bit| target_mask & bit != 0) {
                    engine.start_test(now_ms);
                }
            }
            Message::Status { statuses } => engine.apply_status(mode, statuses),
            _ => {}
        }

        self.last_received_ms = Some(now_ms);
        Ok(Some(message))
    }
}
