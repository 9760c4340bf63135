//! Tally LED policy

use crate::config::{Mode, Settings};
use tally_protocol::CameraStatus;

/// Colours the tally LED can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    Yellow,
    Green,
    Red,
}

/// What the LED should show right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedState {
    pub color: LedColor,
    /// Output level, 0 when off
    pub level: u8,
}

/// Tally colour for the current state
///
/// A running test alert shows yellow on every unit. Otherwise a camera unit
/// shows green on preview and red on program; a host stays dark.
pub fn tally_color(mode: Mode, own_status: Option<CameraStatus>, test_active: bool) -> LedColor {
    if test_active {
        return LedColor::Yellow;
    }
    match (mode, own_status) {
        (Mode::Host, _) => LedColor::Off,
        (_, Some(CameraStatus::Preview)) => LedColor::Green,
        (_, Some(CameraStatus::Program)) => LedColor::Red,
        _ => LedColor::Off,
    }
}

/// Derive the LED output at the configured brightness
pub fn led_state(
    mode: Mode,
    own_status: Option<CameraStatus>,
    test_active: bool,
    settings: &Settings,
) -> LedState {
    let color = tally_color(mode, own_status, test_active);
    let level = match color {
        LedColor::Off => 0,
        _ => settings.brightness_level(),
    };
    LedState { color, level }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_colours() {
        let settings = Settings::default();
        let mode = Mode::Camera(2);
        assert_eq!(
            led_state(mode, Some(CameraStatus::Program), false, &settings),
            LedState { color: LedColor::Red, level: 177 }
        );
        assert_eq!(
            led_state(mode, Some(CameraStatus::Preview), false, &settings).color,
            LedColor::Green
        );
        assert_eq!(
            led_state(mode, Some(CameraStatus::Standby), false, &settings),
            LedState::default()
        );
    }

    #[test]
    fn test_test_alert_wins() {
        let settings = Settings {
            brightness: 4,
            ..Settings::default()
        };
        assert_eq!(
            led_state(Mode::Camera(1), Some(CameraStatus::Program), true, &settings),
            LedState { color: LedColor::Yellow, level: 255 }
        );
        assert_eq!(
            led_state(Mode::Host, None, true, &settings).color,
            LedColor::Yellow
        );
    }

    #[test]
    fn test_host_dark() {
        let settings = Settings::default();
        assert_eq!(led_state(Mode::Host, None, false, &settings).color, LedColor::Off);
    }
}
