//! Device control loop
//!
//! [`Device`] owns every piece of application state and is driven by one
//! cooperative loop calling [`Device::poll`] with a monotonic millisecond
//! clock. Three tickers run off that clock:
//!
//! - display (30 ms): LED output and screen refresh
//! - logic (50 ms): button, navigation, and draining received radio frames
//! - message (host only, >33 ms since the last send): status/test broadcast
//!
//! The serial bridge and alert timers are serviced on every call.

use crate::config::{
    load_settings, save_setting, DeviceConfig, Mode, Settings, DISPLAY_TICK_MS, LOGIC_TICK_MS,
};
use crate::indicator::led_state;
use crate::input::ButtonDebouncer;
use crate::link::{HostBridge, RadioSource, TallyLink};
use crate::menu::{build_device_menu, MenuAction, MenuError, MenuTree, NodeId, AUDIO_ON};
use crate::render::{Renderer, Screen, TallyView};
use crate::state::{DeviceState, NavEffect, NavigationController};
use crate::status::StatusAlertEngine;
use crate::traits::{
    Beeper, ButtonInput, DisplayDriver, DisplayExt, Indicator, PowerControl, RadioTx, SerialLine,
    SettingsKey, SettingsStore,
};

/// Everything the core needs from the hardware
///
/// Implemented automatically for any type providing all collaborator traits.
pub trait Board:
    ButtonInput + RadioTx + SerialLine + Indicator + Beeper + PowerControl + DisplayDriver + SettingsStore
{
}

impl<T> Board for T where
    T: ButtonInput
        + RadioTx
        + SerialLine
        + Indicator
        + Beeper
        + PowerControl
        + DisplayDriver
        + SettingsStore
{
}

/// A tally unit
pub struct Device<'q> {
    config: DeviceConfig,
    settings: Settings,
    tree: MenuTree,
    nav: NavigationController,
    button: ButtonDebouncer,
    engine: StatusAlertEngine,
    link: TallyLink,
    bridge: HostBridge,
    inbox: RadioSource<'q>,
    renderer: Renderer,
    last_display_ms: u32,
    last_logic_ms: u32,
}

impl<'q> Device<'q> {
    /// Load settings from the board's store and build the menu
    pub fn new<B: Board>(
        config: DeviceConfig,
        board: &mut B,
        inbox: RadioSource<'q>,
        now_ms: u32,
    ) -> Result<Self, MenuError> {
        let settings = load_settings(board, config.fleet);
        let tree = build_device_menu(&config, &settings)?;
        let nav = NavigationController::new(&tree, now_ms);

        info!("Device starting as mode {}", settings.mode.index());

        Ok(Self {
            button: ButtonDebouncer::new(config.debounce),
            engine: StatusAlertEngine::new(config.fleet, settings.audio_enabled),
            link: TallyLink::new(),
            bridge: HostBridge::new(),
            renderer: Renderer::new(),
            last_display_ms: now_ms.wrapping_sub(DISPLAY_TICK_MS),
            last_logic_ms: now_ms.wrapping_sub(LOGIC_TICK_MS),
            config,
            settings,
            tree,
            nav,
            inbox,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.settings.mode
    }

    pub fn state(&self) -> DeviceState {
        self.nav.state()
    }

    pub fn tree(&self) -> &MenuTree {
        &self.tree
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.nav
    }

    pub fn engine(&self) -> &StatusAlertEngine {
        &self.engine
    }

    pub fn link(&self) -> &TallyLink {
        &self.link
    }

    pub fn screen(&self) -> &Screen {
        self.renderer.screen()
    }

    /// Run whatever is due at `now_ms`
    pub fn poll<B: Board>(&mut self, now_ms: u32, board: &mut B) {
        if now_ms.wrapping_sub(self.last_logic_ms) >= LOGIC_TICK_MS {
            self.last_logic_ms = now_ms;
            self.logic_tick(now_ms, board);
        }

        if self.settings.mode.is_host() {
            if let Err(e) = self.bridge.poll(board, &mut self.link, &mut self.engine) {
                warn!("Bridge write failed: {}", e);
            }
            if let Err(e) = self.link.poll_broadcast(now_ms, &mut self.engine, board) {
                warn!("Broadcast failed: {}", e);
            }
        }

        if self.engine.tick(now_ms).beep() {
            board.beep();
        }

        if now_ms.wrapping_sub(self.last_display_ms) >= DISPLAY_TICK_MS {
            self.last_display_ms = now_ms;
            self.display_tick(now_ms, board);
        }
    }

    fn logic_tick<B: Board>(&mut self, now_ms: u32, board: &mut B) {
        let event = self.button.take_event();
        let is_host = self.settings.mode.is_host();
        if let Some(effect) = self.nav.handle(&mut self.tree, event, now_ms, is_host) {
            self.dispatch(effect, board);
        }
        self.button.sample(board.is_pressed());

        while let Some(raw) = self.inbox.pop() {
            if let Err(e) = self
                .link
                .receive(&raw, now_ms, self.settings.mode, &mut self.engine)
            {
                trace!("Dropped radio frame: {}", e);
            }
        }
    }

    fn display_tick<B: Board>(&mut self, now_ms: u32, board: &mut B) {
        let mode = self.settings.mode;
        let own_status = self.engine.current_own_status(mode);
        let test_active = self.engine.is_test_active(now_ms);

        let led = led_state(mode, own_status, test_active, &self.settings);
        board.show(led.color, led.level);

        match self.nav.state() {
            DeviceState::Booting => self.renderer.render_boot(),
            DeviceState::Normal => self.renderer.render_normal(&TallyView {
                mode,
                own_status,
                test_active,
                statuses: self.engine.statuses().as_slice(),
                note: self.link.note(),
            }),
            DeviceState::MenuBrowsing | DeviceState::MenuEditingChoice => {
                self.renderer.render_menu(&self.tree, &self.nav)
            }
        }

        if let Err(e) = board.refresh(self.renderer.screen_mut()) {
            warn!("Display refresh failed: {}", e);
        }
    }

    fn dispatch<B: Board>(&mut self, effect: NavEffect, board: &mut B) {
        match effect {
            NavEffect::Action { node, action, .. } => self.run_action(node, action, board),
            NavEffect::SendTest { mask } => self.link.queue_test(mask),
            NavEffect::PowerOff => {
                info!("Powering off");
                board.power_off();
            }
        }
    }

    /// Apply a committed menu choice and persist it
    fn run_action<B: Board>(&mut self, node: NodeId, action: MenuAction, board: &mut B) {
        let Some(index) = self.tree.node(node).and_then(|n| n.selected()) else {
            return;
        };

        let key = match action {
            MenuAction::None => return,
            MenuAction::SetMode => {
                let Some(mode) = Mode::from_index(index as u8, self.config.fleet) else {
                    warn!("Mode index {} out of range", index);
                    return;
                };
                if self.settings.mode.is_host() && !mode.is_host() {
                    self.bridge.reset();
                }
                self.settings.mode = mode;
                SettingsKey::Mode
            }
            MenuAction::SetAudio => {
                self.settings.audio_enabled = index == AUDIO_ON;
                self.engine.set_audio_enabled(self.settings.audio_enabled);
                SettingsKey::Audio
            }
            MenuAction::SetBrightness => {
                self.settings.brightness = index as u8;
                self.settings = self.settings.sanitized(self.config.fleet);
                SettingsKey::Brightness
            }
        };

        if let Err(e) = save_setting(board, key, &self.settings) {
            warn!("Failed to save setting {}: {}", key.as_u8(), e);
        }
    }
}
