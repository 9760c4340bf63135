//! Per-camera tally state as carried in STATUS payloads

/// Tally state of one camera slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CameraStatus {
    /// Not selected on the switcher
    #[default]
    Standby,
    /// Selected as the next source
    Preview,
    /// Currently on air
    Program,
}

// Wire format values
const STATUS_STANDBY: u8 = 0x00;
const STATUS_PREVIEW: u8 = 0x01;
const STATUS_PROGRAM: u8 = 0x02;

impl CameraStatus {
    /// Parse a status from its wire format byte
    ///
    /// Unknown values read as `Standby` so a newer sender never lights a
    /// tally by accident.
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            STATUS_PREVIEW => CameraStatus::Preview,
            STATUS_PROGRAM => CameraStatus::Program,
            _ => CameraStatus::Standby,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            CameraStatus::Standby => STATUS_STANDBY,
            CameraStatus::Preview => STATUS_PREVIEW,
            CameraStatus::Program => STATUS_PROGRAM,
        }
    }

    /// Returns true if the camera is on air
    pub fn is_program(self) -> bool {
        self == CameraStatus::Program
    }

    /// Status of switcher input `input` (1-based) given the switcher's
    /// current preview and program inputs. Program wins when both match.
    pub fn for_input(input: u8, preview: Option<u8>, program: Option<u8>) -> Self {
        if program == Some(input) {
            CameraStatus::Program
        } else if preview == Some(input) {
            CameraStatus::Preview
        } else {
            CameraStatus::Standby
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        let statuses = [
            CameraStatus::Standby,
            CameraStatus::Preview,
            CameraStatus::Program,
        ];

        for status in statuses {
            assert_eq!(CameraStatus::from_byte(status.to_byte()), status);
        }
    }

    #[test]
    fn test_unknown_status_is_standby() {
        assert_eq!(CameraStatus::from_byte(0x03), CameraStatus::Standby);
        assert_eq!(CameraStatus::from_byte(0xFF), CameraStatus::Standby);
    }

    #[test]
    fn test_for_input_program_wins() {
        assert_eq!(
            CameraStatus::for_input(2, Some(2), Some(2)),
            CameraStatus::Program
        );
        assert_eq!(
            CameraStatus::for_input(1, Some(1), Some(3)),
            CameraStatus::Preview
        );
        assert_eq!(CameraStatus::for_input(4, Some(1), Some(3)), CameraStatus::Standby);
        assert_eq!(CameraStatus::for_input(1, None, None), CameraStatus::Standby);
    }
}
