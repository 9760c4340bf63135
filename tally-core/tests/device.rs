//! Whole-device tests against a mock board.

use std::collections::VecDeque;

use tally_core::config::{save_setting, DeviceConfig, Mode, Settings, BOOT_DELAY_MS};
use tally_core::indicator::LedColor;
use tally_core::link::RadioInbox;
use tally_core::render::{Screen, SCREEN_ROWS};
use tally_core::state::DeviceState;
use tally_core::traits::{
    Beeper, ButtonInput, DisplayDriver, DisplayError, Indicator, MemoryStore, PowerControl,
    RadioError, RadioTx, SerialError, SerialLine, SettingsKey, SettingsStore, StoreError,
};
use tally_core::Device;
use tally_protocol::{CameraStatus, Message};

use CameraStatus::{Program, Standby};

const STEP_MS: u32 = 10;

#[derive(Default)]
struct MockBoard {
    pressed: bool,
    sent: Vec<Vec<u8>>,
    serial_rx: VecDeque<u8>,
    serial_tx: Vec<u8>,
    led: (LedColor, u8),
    beeps: usize,
    powered_off: bool,
    draws: usize,
    last_screen: Vec<String>,
    store: MemoryStore,
}

impl MockBoard {
    fn with_settings(settings: Settings) -> Self {
        let mut board = Self::default();
        for key in [SettingsKey::Mode, SettingsKey::Audio, SettingsKey::Brightness] {
            save_setting(&mut board, key, &settings).unwrap();
        }
        board
    }

    fn sent_messages(&self) -> Vec<Message> {
        self.sent
            .iter()
            .map(|raw| Message::decode_radio(raw).unwrap())
            .collect()
    }

    fn serial_output(&self) -> &str {
        std::str::from_utf8(&self.serial_tx).unwrap()
    }
}

impl ButtonInput for MockBoard {
    fn is_pressed(&mut self) -> bool {
        self.pressed
    }
}

impl RadioTx for MockBoard {
    fn broadcast(&mut self, frame: &[u8]) -> Result<(), RadioError> {
        self.sent.push(frame.to_vec());
        Ok(())
    }
}

impl SerialLine for MockBoard {
    fn read_byte(&mut self) -> Option<u8> {
        self.serial_rx.pop_front()
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), SerialError> {
        self.serial_tx.extend_from_slice(bytes);
        Ok(())
    }
}

impl Indicator for MockBoard {
    fn show(&mut self, color: LedColor, level: u8) {
        self.led = (color, level);
    }
}

impl Beeper for MockBoard {
    fn beep(&mut self) {
        self.beeps += 1;
    }
}

impl PowerControl for MockBoard {
    fn power_off(&mut self) {
        self.powered_off = true;
    }
}

impl DisplayDriver for MockBoard {
    fn draw(&mut self, screen: &Screen) -> Result<(), DisplayError> {
        self.draws += 1;
        self.last_screen = screen.lines().map(String::from).collect();
        Ok(())
    }
}

impl SettingsStore for MockBoard {
    fn read(&mut self, key: SettingsKey, buffer: &mut [u8]) -> Result<usize, StoreError> {
        self.store.read(key, buffer)
    }

    fn write(&mut self, key: SettingsKey, data: &[u8]) -> Result<(), StoreError> {
        self.store.write(key, data)
    }
}

/// Poll every `STEP_MS` over `[from, to)`, returning `to`
fn run(device: &mut Device<'_>, board: &mut MockBoard, from: u32, to: u32) -> u32 {
    let mut now = from;
    while now < to {
        device.poll(now, board);
        now += STEP_MS;
    }
    to
}

/// Hold the button for `duration_ms`, then release and settle
fn press(device: &mut Device<'_>, board: &mut MockBoard, now: u32, duration_ms: u32) -> u32 {
    board.pressed = true;
    let now = run(device, board, now, now + duration_ms);
    board.pressed = false;
    run(device, board, now, now + 200)
}

fn camera_settings(slot: u8) -> Settings {
    Settings {
        mode: Mode::Camera(slot),
        ..Settings::default()
    }
}

fn host_settings() -> Settings {
    Settings {
        mode: Mode::Host,
        ..Settings::default()
    }
}

#[test]
fn boots_into_normal_view() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::default();
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();

    run(&mut device, &mut board, 0, BOOT_DELAY_MS - 100);
    assert_eq!(device.state(), DeviceState::Booting);
    run(&mut device, &mut board, BOOT_DELAY_MS - 100, BOOT_DELAY_MS + 100);
    assert_eq!(device.state(), DeviceState::Normal);
    assert_eq!(device.mode(), Mode::Camera(1));
    assert_eq!(board.last_screen[0], "Camera 1");
}

#[test]
fn camera_goes_on_program_and_alerts() {
    let mut inbox = RadioInbox::new();
    let (mut sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(camera_settings(3));
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    let frame = Message::status(&[Standby, Standby, Program, Standby])
        .encode_radio()
        .unwrap();
    sink.push(&frame).unwrap();
    let now = run(&mut device, &mut board, now, now + 60);

    assert_eq!(device.engine().current_own_status(Mode::Camera(3)), Some(Program));
    assert!(device.link().last_received_ms().is_some());
    assert_eq!(board.led, (LedColor::Red, 177));

    run(&mut device, &mut board, now, now + 1000);
    assert_eq!(board.beeps, 2);
    assert_eq!(device.engine().pending_pulses(), 0);
}

#[test]
fn camera_notes_corrupt_frame() {
    let mut inbox = RadioInbox::new();
    let (mut sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(camera_settings(2));
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    let mut frame = Message::Test { target_mask: 0b0010 }.encode_radio().unwrap();
    frame[2] ^= 0x40;
    sink.push(&frame).unwrap();
    run(&mut device, &mut board, now, now + 100);

    assert_eq!(device.link().note(), "CRC failed");
    assert_eq!(board.last_screen[SCREEN_ROWS - 1], "CRC failed");
    assert!(!device.engine().is_test_active(now + 100));
}

#[test]
fn camera_test_alert_turns_led_yellow() {
    let mut inbox = RadioInbox::new();
    let (mut sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(camera_settings(2));
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    let frame = Message::Test { target_mask: 0b0010 }.encode_radio().unwrap();
    sink.push(&frame).unwrap();
    let now = run(&mut device, &mut board, now, now + 100);
    assert_eq!(board.led.0, LedColor::Yellow);
    assert!(board.beeps >= 1);

    run(&mut device, &mut board, now, now + 2500);
    assert_eq!(board.led.0, LedColor::Off);
}

#[test]
fn host_bridge_test_command() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(host_settings());
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();

    board.serial_rx.extend(b"050102f801\n".iter().copied());
    device.poll(20, &mut board);
    assert_eq!(board.serial_output(), "0400ff87\n");
    assert_eq!(device.link().pending_test(), Some(0b0010));
    assert!(board.sent.is_empty());

    device.poll(40, &mut board);
    assert_eq!(board.sent_messages(), vec![Message::Test { target_mask: 0b0010 }]);
    assert!(device.engine().is_test_active(40));
}

#[test]
fn host_broadcasts_bridge_status() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(host_settings());
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    board.serial_rx.extend(b"0902040002000094a9\n".iter().copied());
    run(&mut device, &mut board, now, now + 100);

    assert!(board.serial_output().ends_with("0400ff87\n"));
    let last = board.sent_messages().pop().unwrap();
    assert_eq!(last, Message::status(&[Standby, Program, Standby, Standby]));
    assert_eq!(board.last_screen[2], "1--- 2PGM 3--- 4---");
    assert_eq!(board.led.0, LedColor::Off);
}

#[test]
fn host_ignores_radio_frames() {
    let mut inbox = RadioInbox::new();
    let (mut sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(host_settings());
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();

    let frame = Message::status(&[Program; 4]).encode_radio().unwrap();
    sink.push(&frame).unwrap();
    run(&mut device, &mut board, 0, 200);
    assert_eq!(device.engine().statuses().as_slice(), &[Standby; 4]);
}

#[test]
fn host_click_broadcasts_test_to_all() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::with_settings(host_settings());
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    press(&mut device, &mut board, now, 100);
    assert!(board
        .sent_messages()
        .contains(&Message::Test { target_mask: 0xFF }));
    assert_eq!(device.state(), DeviceState::Normal);
}

#[test]
fn menu_changes_audio_and_persists() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::default();
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    let now = press(&mut device, &mut board, now, 800);
    assert_eq!(device.state(), DeviceState::MenuBrowsing);
    assert_eq!(device.navigation().cursor().selection, 0);

    let now = press(&mut device, &mut board, now, 100);
    let now = press(&mut device, &mut board, now, 100);
    assert_eq!(device.navigation().cursor().selection, 2);

    let now = press(&mut device, &mut board, now, 800);
    assert_eq!(device.state(), DeviceState::MenuEditingChoice);

    let now = press(&mut device, &mut board, now, 100);
    press(&mut device, &mut board, now, 800);
    assert_eq!(device.state(), DeviceState::MenuBrowsing);
    assert!(!device.settings().audio_enabled);

    let stored = tally_core::config::load_settings(&mut board, DeviceConfig::default().fleet);
    assert!(!stored.audio_enabled);
}

#[test]
fn long_hold_keeps_one_menu_entry() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::default();
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    board.pressed = true;
    let now = run(&mut device, &mut board, now, now + 1500);
    assert_eq!(device.state(), DeviceState::MenuBrowsing);
    assert_eq!(device.navigation().current_node(), device.tree().root());
    assert_eq!(device.navigation().cursor().selection, 0);
    board.pressed = false;
    run(&mut device, &mut board, now, now + 200);
    assert_eq!(device.state(), DeviceState::MenuBrowsing);
}

#[test]
fn very_long_hold_powers_off() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::default();
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    board.pressed = true;
    let now = run(&mut device, &mut board, now, now + 3000);
    assert!(!board.powered_off);
    run(&mut device, &mut board, now, now + 2000);
    assert!(board.powered_off);
}

#[test]
fn unchanged_screen_is_not_redrawn() {
    let mut inbox = RadioInbox::new();
    let (_sink, source) = inbox.split();
    let mut board = MockBoard::default();
    let mut device = Device::new(DeviceConfig::default(), &mut board, source, 0).unwrap();
    let now = run(&mut device, &mut board, 0, 2000);

    let draws = board.draws;
    run(&mut device, &mut board, now, now + 1000);
    assert_eq!(board.draws, draws);
}
