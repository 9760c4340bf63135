//! Hex line encoding for the serial bridge.
//!
//! Each frame travels as its bytes in lowercase hex followed by `\n`.
//! Uppercase digits are accepted on input.

use heapless::Vec;

use crate::frame::MAX_FRAME_LEN;

/// Hex digits plus the newline for the largest frame
pub const HEX_LINE_CAPACITY: usize = MAX_FRAME_LEN * 2 + 1;

/// One encoded line, newline included
pub type HexLine = Vec<u8, HEX_LINE_CAPACITY>;

/// Errors from hex line conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HexError {
    /// Odd number of hex digits
    OddLength,
    /// Character outside `[0-9a-fA-F]`
    InvalidDigit,
    /// More bytes than the largest frame
    TooLong,
}

impl From<::hex::FromHexError> for HexError {
    fn from(err: ::hex::FromHexError) -> Self {
        match err {
            ::hex::FromHexError::OddLength => HexError::OddLength,
            ::hex::FromHexError::InvalidHexCharacter { .. } => HexError::InvalidDigit,
            ::hex::FromHexError::InvalidStringLength => HexError::TooLong,
        }
    }
}

/// Encode raw bytes as one newline-terminated hex line
pub fn encode_line(bytes: &[u8]) -> Result<HexLine, HexError> {
    if bytes.len() > MAX_FRAME_LEN {
        return Err(HexError::TooLong);
    }

    let digits = bytes.len() * 2;
    let mut buffer = [0u8; HEX_LINE_CAPACITY];
    ::hex::encode_to_slice(bytes, &mut buffer[..digits])?;
    buffer[digits] = b'\n';

    Vec::from_slice(&buffer[..=digits]).map_err(|_| HexError::TooLong)
}

/// Decode one line of hex digits, without its terminator
pub fn decode_line(line: &[u8]) -> Result<Vec<u8, MAX_FRAME_LEN>, HexError> {
    if line.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }
    let len = line.len() / 2;
    if len > MAX_FRAME_LEN {
        return Err(HexError::TooLong);
    }

    let mut buffer = [0u8; MAX_FRAME_LEN];
    ::hex::decode_to_slice(line, &mut buffer[..len])?;

    Vec::from_slice(&buffer[..len]).map_err(|_| HexError::TooLong)
}
