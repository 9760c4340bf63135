//! Beacon Tally Protocol
//!
//! This crate defines the byte-level protocol shared by every unit of a tally
//! fleet. The same frame format travels over two transports:
//!
//! - the broadcast radio mesh between the host unit and the camera units,
//!   where each byte is additionally XOR-whitened;
//! - the serial line between the host unit and a switcher client, where each
//!   frame is sent as one lowercase hex line terminated by `\n`.
//!
//! # Frame Layout
//!
//! ```text
//! ┌────────┬──────┬─────────────┬───────────────┐
//! │ LENGTH │ TYPE │ PAYLOAD     │ CRC16 (LE)    │
//! │ 1B     │ 1B   │ 0–59B       │ 2B            │
//! └────────┴──────┴─────────────┴───────────────┘
//! ```
//!
//! `LENGTH` counts the whole frame including itself and the checksum. The
//! checksum covers every byte before it.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod client;
pub mod crc16;
pub mod frame;
pub mod hex_line;
pub mod line;
pub mod messages;
pub mod status;

pub use client::{ClientEvent, HostClient, LinkState};
pub use frame::{
    obfuscate, Frame, FrameError, FRAME_BUFFER_SIZE, MAX_FRAME_LEN, MAX_PAYLOAD_SIZE,
    MIN_FRAME_LEN, XOR_KEY,
};
pub use hex_line::{HexError, HexLine};
pub use line::{LineAssembler, LineError};
pub use messages::{Message, StatusList, MAX_STATUS_COUNT};
pub use status::CameraStatus;
