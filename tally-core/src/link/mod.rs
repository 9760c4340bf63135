//! Radio tally link and host serial bridge
//!
//! - [`TallyLink`]: periodic broadcast (host) and frame handling (camera)
//! - [`RadioInbox`]: bounded queue from the radio callback to the control loop
//! - [`HostBridge`]: hex line protocol to the switcher client

mod bridge;
mod inbox;
mod tally;

pub use bridge::{HostBridge, BRIDGE_LINE_CAPACITY, MAX_BYTES_PER_POLL};
pub use inbox::{RadioInbox, RadioSink, RadioSource, RawFrame, RADIO_QUEUE_DEPTH};
pub use tally::{TallyLink, MAX_NOTE_LEN};

use crate::traits::{RadioError, SerialError};
use tally_protocol::{FrameError, HexError};

/// Link layer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Frame could not be decoded or encoded
    Frame(FrameError),
    /// Hex line could not be converted
    Hex(HexError),
    /// Receive queue full
    QueueFull,
    /// Radio driver rejected the frame
    Radio(RadioError),
    /// Serial port write failed
    Serial(SerialError),
}

impl From<FrameError> for LinkError {
    fn from(e: FrameError) -> Self {
        LinkError::Frame(e)
    }
}

impl From<HexError> for LinkError {
    fn from(e: HexError) -> Self {
        LinkError::Hex(e)
    }
}

impl From<RadioError> for LinkError {
    fn from(e: RadioError) -> Self {
        LinkError::Radio(e)
    }
}

impl From<SerialError> for LinkError {
    fn from(e: SerialError) -> Self {
        LinkError::Serial(e)
    }
}
