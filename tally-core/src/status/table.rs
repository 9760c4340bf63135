//! Per-slot camera status table

use crate::config::{FleetSize, MAX_CAMERAS};
use tally_protocol::CameraStatus;

/// Tally status of every camera slot in the fleet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTable {
    entries: [CameraStatus; MAX_CAMERAS],
    len: usize,
}

impl StatusTable {
    /// All slots start in standby
    pub fn new(fleet: FleetSize) -> Self {
        Self {
            entries: [CameraStatus::Standby; MAX_CAMERAS],
            len: fleet.len().min(MAX_CAMERAS),
        }
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Status of a 1-based slot
    pub fn get(&self, slot: u8) -> Option<CameraStatus> {
        let index = usize::from(slot).checked_sub(1)?;
        self.as_slice().get(index).copied()
    }

    pub fn as_slice(&self) -> &[CameraStatus] {
        &self.entries[..self.len]
    }

    /// Overwrite the leading slots from a status list
    ///
    /// Entries past the fleet size are ignored. Returns the number written.
    pub fn apply(&mut self, statuses: &[CameraStatus]) -> usize {
        let count = statuses.len().min(self.len);
        self.entries[..count].copy_from_slice(&statuses[..count]);
        count
    }
}
