//! Settings persistence
//!
//! Each setting is stored under its own key as a postcard blob. Missing or
//! unreadable values fall back to defaults.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::types::{FleetSize, Mode, Settings};
use crate::traits::storage::{SettingsKey, SettingsStore, StoreError};

/// Largest serialized setting
const MAX_SETTING_SIZE: usize = 8;

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Store operation failed
    Store(StoreError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Stored value is outside its valid range
    OutOfRange,
}

impl From<StoreError> for SettingsError {
    fn from(e: StoreError) -> Self {
        SettingsError::Store(e)
    }
}

/// Load all settings from the store
///
/// Each key is loaded independently; a bad value only resets that setting.
pub fn load_settings<S: SettingsStore>(store: &mut S, fleet: FleetSize) -> Settings {
    let defaults = Settings::default();

    let mode = match load_value::<Mode, _>(store, SettingsKey::Mode) {
        Ok(mode) if mode.is_valid(fleet) => Ok(mode),
        Ok(_) => Err(SettingsError::OutOfRange),
        Err(e) => Err(e),
    };
    let audio_enabled = load_value::<bool, _>(store, SettingsKey::Audio);
    let brightness = match load_value::<u8, _>(store, SettingsKey::Brightness) {
        Ok(level) if level < super::BRIGHTNESS_LEVELS => Ok(level),
        Ok(_) => Err(SettingsError::OutOfRange),
        Err(e) => Err(e),
    };

    let settings = Settings {
        mode: or_default(mode, defaults.mode, SettingsKey::Mode),
        audio_enabled: or_default(audio_enabled, defaults.audio_enabled, SettingsKey::Audio),
        brightness: or_default(brightness, defaults.brightness, SettingsKey::Brightness),
    };

    info!(
        "Settings: mode={} audio={} brightness={}",
        settings.mode.index(),
        settings.audio_enabled,
        settings.brightness
    );
    settings
}

/// Persist the setting stored under `key`
pub fn save_setting<S: SettingsStore>(
    store: &mut S,
    key: SettingsKey,
    settings: &Settings,
) -> Result<(), SettingsError> {
    match key {
        SettingsKey::Mode => save_value(store, key, &settings.mode),
        SettingsKey::Audio => save_value(store, key, &settings.audio_enabled),
        SettingsKey::Brightness => save_value(store, key, &settings.brightness),
    }
}

fn or_default<T>(loaded: Result<T, SettingsError>, default: T, key: SettingsKey) -> T {
    match loaded {
        Ok(value) => value,
        Err(SettingsError::Store(StoreError::NotFound)) => {
            debug!("No stored value for key {}, using default", key.as_u8());
            default
        }
        Err(e) => {
            warn!("Failed to load key {}: {}, using default", key.as_u8(), e);
            default
        }
    }
}

fn load_value<T: DeserializeOwned, S: SettingsStore>(
    store: &mut S,
    key: SettingsKey,
) -> Result<T, SettingsError> {
    let mut buffer = [0u8; MAX_SETTING_SIZE];
    let len = store.read(key, &mut buffer)?;
    postcard::from_bytes(&buffer[..len]).map_err(|_| SettingsError::Deserialize)
}

fn save_value<T: Serialize, S: SettingsStore>(
    store: &mut S,
    key: SettingsKey,
    value: &T,
) -> Result<(), SettingsError> {
    let mut buffer = [0u8; MAX_SETTING_SIZE];
    let bytes = postcard::to_slice(value, &mut buffer).map_err(|_| SettingsError::Serialize)?;
    store.write(key, bytes)?;
    debug!("Saved {} bytes for key {}", bytes.len(), key.as_u8());
    Ok(())
}
