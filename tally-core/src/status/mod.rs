//! Camera status tracking and alert derivation
//!
//! This module holds the per-slot tally table along with the timed alerts
//! derived from it: program transition pulses and the test window.

mod engine;
mod table;

pub use engine::{StatusAlertEngine, TestWindow, TickOutput};
pub use table::StatusTable;
