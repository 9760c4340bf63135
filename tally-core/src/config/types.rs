//! Configuration type definitions
//!
//! `Settings` is what the user changes from the menu and what survives a
//! power cycle. `DeviceConfig` is fixed when the board constructs the device.

use core::fmt::Write;

use heapless::String;
use serde::{Deserialize, Serialize};

use super::constants::{
    BRIGHTNESS_LEVELS, BRIGHTNESS_SCALES, DEFAULT_BRIGHTNESS, DOUBLE_CLICK_MS, HOLD_TIME_MS,
    LOGIC_TICK_MS, MAX_CAMERAS,
};

/// Maximum length of a menu or mode label
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum length of the device identity string (a MAC address fits)
pub const MAX_IDENTITY_LEN: usize = 32;

/// Number of camera slots in the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FleetSize {
    #[default]
    Four,
    Eight,
}

impl FleetSize {
    /// Number of camera slots
    pub const fn count(self) -> u8 {
        match self {
            FleetSize::Four => 4,
            FleetSize::Eight => 8,
        }
    }

    /// Slot count as an index bound
    pub const fn len(self) -> usize {
        self.count() as usize
    }
}

/// Role of this unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Bridges the switcher and broadcasts status
    Host,
    /// Shows the tally of one camera slot (1-based)
    Camera(u8),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Camera(1)
    }
}

impl Mode {
    /// Parse the stored/menu encoding: 0 is host, k is camera k
    pub fn from_index(index: u8, fleet: FleetSize) -> Option<Self> {
        match index {
            0 => Some(Mode::Host),
            slot if slot <= fleet.count() => Some(Mode::Camera(slot)),
            _ => None,
        }
    }

    /// Stored/menu encoding
    pub fn index(self) -> u8 {
        match self {
            Mode::Host => 0,
            Mode::Camera(slot) => slot,
        }
    }

    pub fn is_host(self) -> bool {
        self == Mode::Host
    }

    /// Camera slot, if this is a camera unit
    pub fn slot(self) -> Option<u8> {
        match self {
            Mode::Host => None,
            Mode::Camera(slot) => Some(slot),
        }
    }

    /// Bit of this slot in a TEST target mask
    pub fn test_bit(self) -> Option<u8> {
        match self {
            Mode::Camera(slot @ 1..=8) => Some(1 << (slot - 1)),
            _ => None,
        }
    }

    /// Check the slot against the fleet size
    pub fn is_valid(self, fleet: FleetSize) -> bool {
        match self {
            Mode::Host => true,
            Mode::Camera(slot) => slot >= 1 && slot <= fleet.count(),
        }
    }

    /// Human readable label ("Host", "Camera 3")
    pub fn label(self) -> String<MAX_LABEL_LEN> {
        let mut label = String::new();
        let _ = match self {
            Mode::Host => label.push_str("Host").map_err(|_| core::fmt::Error),
            Mode::Camera(slot) => write!(label, "Camera {}", slot),
        };
        label
    }
}

/// User settings persisted across power cycles
///
/// Stored field by field, one key each; see `save_setting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Host or camera role
    pub mode: Mode,
    /// Beep on tally changes and tests
    pub audio_enabled: bool,
    /// Index into [`BRIGHTNESS_SCALES`]
    pub brightness: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            audio_enabled: true,
            brightness: DEFAULT_BRIGHTNESS,
        }
    }
}

impl Settings {
    /// LED output level for the current brightness setting
    pub fn brightness_level(&self) -> u8 {
        let index = (self.brightness as usize).min(BRIGHTNESS_SCALES.len() - 1);
        BRIGHTNESS_SCALES[index]
    }

    /// Replace out-of-range values with defaults
    pub fn sanitized(mut self, fleet: FleetSize) -> Self {
        if !self.mode.is_valid(fleet) {
            self.mode = Mode::default();
        }
        if self.brightness >= BRIGHTNESS_LEVELS {
            self.brightness = DEFAULT_BRIGHTNESS;
        }
        self
    }
}

/// How a short release is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClickMode {
    /// Every short press is a `Clicked`, reported one tick after release
    #[default]
    SingleOnly,
    /// A second press inside the window is a `DoubleClicked`; a lone press
    /// is reported as `Clicked` when the window closes
    DoubleClick,
}

/// Button debounce timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DebounceConfig {
    /// Sampling period
    pub tick_ms: u32,
    /// Press duration reported as a hold
    pub hold_ms: u32,
    /// Double click window
    pub double_click_ms: u32,
    /// Single or double click reporting
    pub click_mode: ClickMode,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            tick_ms: LOGIC_TICK_MS,
            hold_ms: HOLD_TIME_MS,
            double_click_ms: DOUBLE_CLICK_MS,
            click_mode: ClickMode::SingleOnly,
        }
    }
}

impl DebounceConfig {
    /// Held is reported once the press counter exceeds this
    pub fn hold_ticks(&self) -> u16 {
        (self.hold_ms / self.tick_ms.max(1)) as u16
    }

    /// Double click window in ticks
    pub fn window_ticks(&self) -> u8 {
        (self.double_click_ms / self.tick_ms.max(1)).min(u8::MAX as u32) as u8
    }
}

/// Fixed configuration supplied by the board
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Fleet size
    pub fleet: FleetSize,
    /// Button timing
    pub debounce: DebounceConfig,
    /// Identity shown under "Address" (normally the radio MAC)
    pub identity: String<MAX_IDENTITY_LEN>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            fleet: FleetSize::default(),
            debounce: DebounceConfig::default(),
            identity: String::new(),
        }
    }
}

impl DeviceConfig {
    /// Config with the given identity, truncated to fit
    pub fn with_identity(identity: &str) -> Self {
        let mut config = Self::default();
        for ch in identity.chars() {
            if config.identity.push(ch).is_err() {
                break;
            }
        }
        config
    }
}

const _: () = assert!(FleetSize::Eight.len() <= MAX_CAMERAS);
