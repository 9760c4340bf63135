//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod display;
pub mod input;
pub mod output;
pub mod radio;
pub mod serial;
pub mod storage;

pub use display::{DisplayDriver, DisplayError, DisplayExt};
pub use input::ButtonInput;
pub use output::{Beeper, Indicator, PowerControl};
pub use radio::{RadioError, RadioTx};
pub use serial::{SerialError, SerialLine};
pub use storage::{MemoryStore, SettingsKey, SettingsStore, StoreError};
