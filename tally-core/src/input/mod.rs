//! User input
//!
//! One physical button, sampled on the logic tick.

pub mod button;

pub use button::{ButtonDebouncer, ButtonEvent};
