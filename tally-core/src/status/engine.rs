//! Status alert engine
//!
//! Applies incoming status snapshots to the table and derives the audible
//! cues: a short burst of pulses when the own camera goes on or off air,
//! and a periodic beep while a test alert is active.

use super::table::StatusTable;
use crate::config::{
    FleetSize, Mode, ALERT_PULSE_INTERVAL_MS, PROGRAM_ENTER_PULSES, PROGRAM_LEAVE_PULSES,
    TEST_BEEP_INTERVAL_MS, TEST_MODE_MS,
};
use tally_protocol::CameraStatus;

/// Cues produced by one [`StatusAlertEngine::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutput {
    /// Periodic beep of an active test alert
    pub test_beep: bool,
    /// One program transition pulse
    pub alert_pulse: bool,
}

impl TickOutput {
    /// True if the beeper should sound
    pub fn beep(&self) -> bool {
        self.test_beep || self.alert_pulse
    }
}

/// Active test alert
///
/// Active while `now - start <= TEST_MODE_MS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestWindow {
    started_ms: Option<u32>,
    last_beep_ms: Option<u32>,
}

impl TestWindow {
    /// Open (or restart) the window at `now_ms`
    pub fn start(&mut self, now_ms: u32) {
        self.started_ms = Some(now_ms);
        self.last_beep_ms = None;
    }

    pub fn is_active(&self, now_ms: u32) -> bool {
        self.started_ms
            .is_some_and(|start| now_ms.wrapping_sub(start) <= TEST_MODE_MS)
    }

    /// Advance the window, returning true when a beep is due
    fn tick(&mut self, now_ms: u32) -> bool {
        if !self.is_active(now_ms) {
            self.started_ms = None;
            return false;
        }
        let due = self
            .last_beep_ms
            .map_or(true, |last| now_ms.wrapping_sub(last) >= TEST_BEEP_INTERVAL_MS);
        if due {
            self.last_beep_ms = Some(now_ms);
        }
        due
    }
}

/// Status table plus the alerts derived from it
#[derive(Debug, Clone)]
pub struct StatusAlertEngine {
    table: StatusTable,
    audio_enabled: bool,
    pending_pulses: u8,
    last_pulse_ms: Option<u32>,
    test: TestWindow,
}

impl StatusAlertEngine {
    pub fn new(fleet: FleetSize, audio_enabled: bool) -> Self {
        Self {
            table: StatusTable::new(fleet),
            audio_enabled,
            pending_pulses: 0,
            last_pulse_ms: None,
            test: TestWindow::default(),
        }
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn statuses(&self) -> &StatusTable {
        &self.table
    }

    /// Alert pulses still to be emitted
    pub fn pending_pulses(&self) -> u8 {
        self.pending_pulses
    }

    /// Status of this unit's own camera; a host has none
    pub fn current_own_status(&self, mode: Mode) -> Option<CameraStatus> {
        self.table.get(mode.slot()?)
    }

    /// Apply a status snapshot received over the radio
    ///
    /// Arms transition pulses for the own slot when audio is enabled.
    pub fn apply_status(&mut self, mode: Mode, statuses: &[CameraStatus]) {
        let before = self.current_own_status(mode);
        self.table.apply(statuses);
        let after = self.current_own_status(mode);

        if !self.audio_enabled {
            return;
        }
        let was_live = before.is_some_and(CameraStatus::is_program);
        let is_live = after.is_some_and(CameraStatus::is_program);
        if !was_live && is_live {
            debug!("Own camera on program");
            self.pending_pulses = PROGRAM_ENTER_PULSES;
        } else if was_live && !is_live {
            debug!("Own camera left program");
            self.pending_pulses = PROGRAM_LEAVE_PULSES;
        }
    }

    /// Apply a status snapshot from the switcher bridge, without alerts
    pub fn apply_authoritative(&mut self, statuses: &[CameraStatus]) {
        self.table.apply(statuses);
    }

    /// Open the test alert window
    pub fn start_test(&mut self, now_ms: u32) {
        info!("Test alert started");
        self.test.start(now_ms);
    }

    pub fn is_test_active(&self, now_ms: u32) -> bool {
        self.test.is_active(now_ms)
    }

    /// Advance alert timers
    pub fn tick(&mut self, now_ms: u32) -> TickOutput {
        let test_beep = self.test.tick(now_ms);

        let mut alert_pulse = false;
        if self.pending_pulses > 0 {
            let due = self
                .last_pulse_ms
                .map_or(true, |last| now_ms.wrapping_sub(last) >= ALERT_PULSE_INTERVAL_MS);
            if due {
                self.last_pulse_ms = Some(now_ms);
                self.pending_pulses -= 1;
                alert_pulse = true;
            }
        }

        TickOutput {
            test_beep,
            alert_pulse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CameraStatus::{Preview, Program, Standby};

    fn pulses_over(engine: &mut StatusAlertEngine, from: u32, to: u32, step: u32) -> usize {
        (from..to)
            .step_by(step as usize)
            .filter(|t| engine.tick(*t).alert_pulse)
            .count()
    }

    #[test]
    fn test_own_slot_to_program_arms_two() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        let mode = Mode::Camera(3);
        engine.apply_status(mode, &[Standby, Standby, Program, Standby]);

        assert_eq!(engine.current_own_status(mode), Some(Program));
        assert_eq!(engine.pending_pulses(), 2);
    }

    #[test]
    fn test_slot_two_reads_second_entry() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        let mode = Mode::Camera(2);
        engine.apply_status(mode, &[Standby, Program, Standby, Standby]);

        assert_eq!(engine.current_own_status(mode), Some(Program));
        assert_eq!(engine.pending_pulses(), 2);
    }

    #[test]
    fn test_leaving_program_arms_one() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        let mode = Mode::Camera(1);
        engine.apply_status(mode, &[Program]);
        engine.apply_status(mode, &[Preview]);
        assert_eq!(engine.pending_pulses(), 1);
    }

    #[test]
    fn test_other_slot_changes_do_not_arm() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        engine.apply_status(Mode::Camera(1), &[Standby, Program, Program, Program]);
        assert_eq!(engine.pending_pulses(), 0);
    }

    #[test]
    fn test_audio_off_never_arms() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, false);
        engine.apply_status(Mode::Camera(1), &[Program]);
        assert_eq!(engine.current_own_status(Mode::Camera(1)), Some(Program));
        assert_eq!(engine.pending_pulses(), 0);
    }

    #[test]
    fn test_authoritative_does_not_arm() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        engine.apply_authoritative(&[Program, Preview]);
        assert_eq!(engine.pending_pulses(), 0);
        assert_eq!(engine.statuses().as_slice(), &[Program, Preview, Standby, Standby]);
    }

    #[test]
    fn test_host_has_no_own_status() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        engine.apply_status(Mode::Host, &[Program; 4]);
        assert_eq!(engine.current_own_status(Mode::Host), None);
        assert_eq!(engine.pending_pulses(), 0);
    }

    #[test]
    fn test_pulses_are_spaced() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        engine.apply_status(Mode::Camera(1), &[Program]);

        assert!(engine.tick(1000).alert_pulse);
        assert!(!engine.tick(1100).alert_pulse);
        assert!(engine.tick(1150).alert_pulse);
        assert_eq!(engine.pending_pulses(), 0);
        assert_eq!(pulses_over(&mut engine, 1200, 3000, 50), 0);
    }

    #[test]
    fn test_window_beeps_then_expires() {
        let mut engine = StatusAlertEngine::new(FleetSize::Four, true);
        engine.start_test(10_000);

        let beeps = (10_000..=10_000 + TEST_MODE_MS)
            .step_by(50)
            .filter(|t| engine.tick(*t).test_beep)
            .count();
        // 0, 400, 800, 1200, 1600, 2000
        assert_eq!(beeps, 6);

        assert!(engine.is_test_active(10_000 + TEST_MODE_MS));
        assert!(!engine.is_test_active(10_000 + TEST_MODE_MS + 1));
        assert!(!engine.tick(10_000 + TEST_MODE_MS + 50).test_beep);
    }

    #[test]
    fn test_restart_beeps_immediately() {
        let mut window = TestWindow::default();
        window.start(0);
        assert!(window.tick(0));
        window.start(100);
        assert!(window.tick(100));
        assert!(!window.tick(200));
    }
}
