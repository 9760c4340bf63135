//! Frame encoding and decoding for the tally protocol.
//!
//! Frame format:
//! - LENGTH (1 byte): total frame length, including LENGTH and CRC
//! - TYPE (1 byte): message type identifier
//! - PAYLOAD (0-59 bytes): type-specific data
//! - CRC (2 bytes): CRC16 of LENGTH, TYPE and PAYLOAD, little-endian
//!
//! On the radio every byte of the frame is XORed with [`XOR_KEY`]. This only
//! keeps casual sniffers from reading tally state off the air. It is not
//! encryption and gives no authentication.

use heapless::Vec;

use crate::crc16::checksum;

/// Size of every receive buffer. Anything this long or longer is dropped.
pub const FRAME_BUFFER_SIZE: usize = 64;

/// Longest frame that fits a receive buffer
pub const MAX_FRAME_LEN: usize = FRAME_BUFFER_SIZE - 1;

/// LENGTH + TYPE + CRC
pub const MIN_FRAME_LEN: usize = 4;

/// Maximum payload size in bytes
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_LEN - MIN_FRAME_LEN;

/// Single byte whitening key applied to radio frames
pub const XOR_KEY: u8 = 0x67;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Received more bytes than a receive buffer holds
    Overflow,
    /// Fewer bytes than the smallest possible frame
    TooShort,
    /// LENGTH byte disagrees with the number of bytes received
    LengthMismatch,
    /// Checksum mismatch
    CrcMismatch,
    /// Frame length is wrong for its message type
    InvalidLength { msg_type: u8 },
    /// Message type is not part of the protocol
    UnknownType(u8),
    /// Payload exceeds maximum allowed size
    PayloadTooLarge,
    /// Buffer too small for encoding
    BufferTooSmall,
}

/// A parsed or constructed frame, without its length and checksum bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Message type identifier
    pub msg_type: u8,
    /// Payload data
    pub payload: Vec<u8, MAX_PAYLOAD_SIZE>,
}

impl Frame {
    /// Create a new frame with the given message type and payload
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self, FrameError> {
        let mut payload_vec = Vec::new();
        payload_vec
            .extend_from_slice(payload)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            msg_type,
            payload: payload_vec,
        })
    }

    /// Create a frame with no payload
    pub fn empty(msg_type: u8) -> Self {
        Self {
            msg_type,
            payload: Vec::new(),
        }
    }

    /// Total encoded length, as carried in the LENGTH byte
    pub fn encoded_len(&self) -> usize {
        MIN_FRAME_LEN + self.payload.len()
    }

    /// Encode this frame into a byte buffer
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let frame_len = self.encoded_len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let body_end = frame_len - 2;
        buffer[0] = frame_len as u8;
        buffer[1] = self.msg_type;
        buffer[2..body_end].copy_from_slice(&self.payload);

        let crc = checksum(&buffer[..body_end]);
        buffer[body_end..frame_len].copy_from_slice(&crc.to_le_bytes());

        Ok(frame_len)
    }

    /// Encode this frame into a heapless Vec
    pub fn encode_to_vec(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        let mut buffer = [0u8; MAX_FRAME_LEN];
        let len = self.encode(&mut buffer)?;
        Vec::from_slice(&buffer[..len]).map_err(|_| FrameError::BufferTooSmall)
    }

    /// Encode and whiten a frame for radio broadcast
    pub fn encode_radio(&self) -> Result<Vec<u8, MAX_FRAME_LEN>, FrameError> {
        let mut bytes = self.encode_to_vec()?;
        obfuscate(&mut bytes);
        Ok(bytes)
    }

    /// Decode a complete plain frame
    ///
    /// Checks, in order: buffer bound, minimum length, LENGTH byte, CRC.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() >= FRAME_BUFFER_SIZE {
            return Err(FrameError::Overflow);
        }
        if bytes.len() < MIN_FRAME_LEN {
            return Err(FrameError::TooShort);
        }
        if bytes[0] as usize != bytes.len() {
            return Err(FrameError::LengthMismatch);
        }

        let body_end = bytes.len() - 2;
        let expected = checksum(&bytes[..body_end]);
        let received = u16::from_le_bytes([bytes[body_end], bytes[body_end + 1]]);
        if expected != received {
            return Err(FrameError::CrcMismatch);
        }

        Frame::new(bytes[1], &bytes[2..body_end])
    }

    /// Remove radio whitening and decode
    pub fn decode_radio(raw: &[u8]) -> Result<Self, FrameError> {
        if raw.len() >= FRAME_BUFFER_SIZE {
            return Err(FrameError::Overflow);
        }
        let mut buffer = [0u8; FRAME_BUFFER_SIZE];
        let plain = &mut buffer[..raw.len()];
        plain.copy_from_slice(raw);
        obfuscate(plain);
        Self::decode(plain)
    }
}

/// XOR every byte with [`XOR_KEY`]. Applying it twice restores the input.
pub fn obfuscate(bytes: &mut [u8]) {
    for byte in bytes.iter_mut() {
        *byte ^= XOR_KEY;
    }
}
