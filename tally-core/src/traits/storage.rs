//! Persistent settings storage

use heapless::Vec;

/// Storage keys for settings
///
/// The actual storage implementation handles wear leveling and data
/// integrity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingsKey {
    /// Host or camera role
    Mode = 0,
    /// Audio on/off
    Audio = 1,
    /// LED brightness setting
    Brightness = 2,
}

impl SettingsKey {
    /// Number of keys
    pub const COUNT: usize = 3;

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SettingsKey::Mode),
            1 => Some(SettingsKey::Audio),
            2 => Some(SettingsKey::Brightness),
            _ => None,
        }
    }
}

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Backend read or write failed
    Backend,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Storage is full
    Full,
}

/// Key-value store for settings blobs
pub trait SettingsStore {
    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read.
    fn read(&mut self, key: SettingsKey, buffer: &mut [u8]) -> Result<usize, StoreError>;

    /// Write a value by key
    fn write(&mut self, key: SettingsKey, data: &[u8]) -> Result<(), StoreError>;
}

/// Largest blob [`MemoryStore`] keeps per key
pub const MEMORY_SLOT_SIZE: usize = 16;

/// RAM-backed store, for boards without flash and for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: [Option<Vec<u8, MEMORY_SLOT_SIZE>>; SettingsKey::COUNT],
}

impl MemoryStore {
    pub const fn new() -> Self {
        Self {
            slots: [None, None, None],
        }
    }

    /// Forget every stored value
    pub fn erase_all(&mut self) {
        self.slots = [None, None, None];
    }
}

impl SettingsStore for MemoryStore {
    fn read(&mut self, key: SettingsKey, buffer: &mut [u8]) -> Result<usize, StoreError> {
        let data = self.slots[key.as_u8() as usize]
            .as_ref()
            .ok_or(StoreError::NotFound)?;
        if buffer.len() < data.len() {
            return Err(StoreError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn write(&mut self, key: SettingsKey, data: &[u8]) -> Result<(), StoreError> {
        let value = Vec::from_slice(data).map_err(|_| StoreError::Full)?;
        self.slots[key.as_u8() as usize] = Some(value);
        Ok(())
    }
}
