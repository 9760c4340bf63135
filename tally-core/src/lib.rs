//! Board-agnostic core logic for camera tally units
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (radio, serial, LED, beeper, display)
//! - Button debouncing into discrete events
//! - Menu tree and the navigation state machine
//! - Per-camera status table and alert derivation
//! - Radio tally link and the host serial bridge
//! - Settings types and persistence
//! - The `Device` control loop tying it all together

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod device;
pub mod indicator;
pub mod input;
pub mod link;
pub mod menu;
pub mod render;
pub mod state;
pub mod status;
pub mod traits;

pub use device::{Board, Device};
