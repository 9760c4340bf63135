//! Indicator, beeper and power traits

use crate::indicator::LedColor;

/// External tally LED strip
pub trait Indicator {
    /// Show `color` at `level` (0-255). `LedColor::Off` clears the strip.
    fn show(&mut self, color: LedColor, level: u8);
}

/// Piezo beeper
pub trait Beeper {
    /// Emit one short beep without blocking
    fn beep(&mut self);
}

/// Power management unit
pub trait PowerControl {
    /// Cut power to the unit
    fn power_off(&mut self);
}
