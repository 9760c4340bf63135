//! Device state machine and menu navigation
//!
//! The state machine is explicit, finite, and deterministic. The
//! navigation controller drives it from button events.

pub mod events;
pub mod machine;
pub mod navigation;

pub use events::Event;
pub use machine::DeviceState;
pub use navigation::{Cursor, NavEffect, NavigationController};
