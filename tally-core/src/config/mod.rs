//! Configuration types
//!
//! Compile-time timing constants, construction-time device configuration,
//! and user settings persisted as postcard binary data.

pub mod constants;
pub mod settings;
pub mod types;

pub use constants::*;
pub use settings::{load_settings, save_setting, SettingsError};
pub use types::*;
