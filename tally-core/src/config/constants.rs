//! Timing and behaviour constants
//!
//! All periods are milliseconds of the monotonic clock passed to
//! [`Device::poll`](crate::Device::poll).

/// Firmware version shown in the menu
pub const FIRMWARE_VERSION: &str = "1.0";

/// Screen and LED refresh period
pub const DISPLAY_TICK_MS: u32 = 30;

/// Button sampling and navigation period
pub const LOGIC_TICK_MS: u32 = 50;

/// Host broadcast period (strictly greater than this since the last send)
pub const MESSAGE_INTERVAL_MS: u32 = 33;

/// Splash screen time before the normal view
pub const BOOT_DELAY_MS: u32 = 1500;

/// Press duration reported as a hold
pub const HOLD_TIME_MS: u32 = 500;

/// Second click must land within this window for a double click
pub const DOUBLE_CLICK_MS: u32 = 600;

/// A hold this long after the last idle reading powers the unit off
pub const POWER_OFF_HOLD_MS: u32 = 4000;

/// Test alert duration
pub const TEST_MODE_MS: u32 = 2000;

/// Beep period while a test alert is active
pub const TEST_BEEP_INTERVAL_MS: u32 = 400;

/// Minimum spacing between alert pulses
pub const ALERT_PULSE_INTERVAL_MS: u32 = 150;

/// Pulses armed when the own camera goes on air
pub const PROGRAM_ENTER_PULSES: u8 = 2;

/// Pulses armed when the own camera leaves air
pub const PROGRAM_LEAVE_PULSES: u8 = 1;

/// LED brightness per brightness setting
pub const BRIGHTNESS_SCALES: [u8; 5] = [40, 82, 177, 219, 255];

/// Number of brightness settings
pub const BRIGHTNESS_LEVELS: u8 = BRIGHTNESS_SCALES.len() as u8;

/// Brightness setting used when none is stored
pub const DEFAULT_BRIGHTNESS: u8 = 2;

/// Largest supported fleet
pub const MAX_CAMERAS: usize = 8;
