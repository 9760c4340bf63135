//! Menu data structure
//!
//! An arena tree of plain and single-choice nodes, plus the builder for
//! the device's settings menu.

pub mod builder;
pub mod tree;

pub use builder::{build_device_menu, AUDIO_OFF, AUDIO_ON};
pub use tree::{MenuAction, MenuError, MenuNode, MenuTree, NodeId, NodeKind};
