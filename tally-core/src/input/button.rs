//! Button debouncing
//!
//! The raw level is sampled once per logic tick. Sampling at that period is
//! the debounce: contact bounce shorter than a tick is never seen.

use crate::config::{ClickMode, DebounceConfig};

/// Discrete button events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Nothing happened since the last read
    #[default]
    Idle,
    /// Button went down
    Pressed,
    /// Button has been down longer than the hold time; repeats until release
    Held,
    /// Button came up after a hold
    Released,
    /// Short press completed
    Clicked,
    /// Second short press inside the double click window
    DoubleClicked,
}

/// Turns sampled button levels into [`ButtonEvent`]s
///
/// At most one event is pending between reads. `Held` stays pending while
/// the button is down; every other event is cleared by [`take_event`].
///
/// [`take_event`]: ButtonDebouncer::take_event
#[derive(Debug, Clone)]
pub struct ButtonDebouncer {
    hold_ticks: u16,
    window_ticks: u8,
    click_mode: ClickMode,
    /// Consecutive pressed samples
    key_down_ticks: u16,
    /// Ticks left in the open double click window
    window_remaining: u8,
    value: ButtonEvent,
}

impl Default for ButtonDebouncer {
    fn default() -> Self {
        Self::new(DebounceConfig::default())
    }
}

impl ButtonDebouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            hold_ticks: config.hold_ticks(),
            window_ticks: config.window_ticks().max(1),
            click_mode: config.click_mode,
            key_down_ticks: 0,
            window_remaining: 0,
            value: ButtonEvent::Idle,
        }
    }

    /// Number of consecutive pressed samples that produce `Held`
    pub fn hold_threshold(&self) -> u16 {
        self.hold_ticks + 1
    }

    /// Feed one sample of the raw button level
    pub fn sample(&mut self, pressed: bool) {
        if pressed {
            self.key_down_ticks = self.key_down_ticks.saturating_add(1);
            if self.key_down_ticks > self.hold_ticks {
                self.value = ButtonEvent::Held;
            } else if self.key_down_ticks == self.hold_ticks && self.window_remaining > 0 {
                // May become a hold next sample; report the earlier click first
                self.window_remaining = 0;
                self.value = ButtonEvent::Clicked;
            } else if self.key_down_ticks == 1 && self.value == ButtonEvent::Idle {
                self.value = ButtonEvent::Pressed;
            }
        } else {
            if self.key_down_ticks > 0 {
                self.on_release();
            }
            self.key_down_ticks = 0;
        }

        if self.window_remaining > 0 {
            self.window_remaining -= 1;
            if self.window_remaining == 0 {
                self.value = ButtonEvent::Clicked;
            }
        }
    }

    fn on_release(&mut self) {
        if self.value == ButtonEvent::Held {
            self.value = ButtonEvent::Released;
            self.window_remaining = 0;
            return;
        }

        match self.click_mode {
            ClickMode::DoubleClick if self.window_remaining > 0 => {
                self.value = ButtonEvent::DoubleClicked;
                self.window_remaining = 0;
            }
            ClickMode::DoubleClick => self.window_remaining = self.window_ticks,
            // Closes on this same sample
            ClickMode::SingleOnly => self.window_remaining = 1,
        }
    }

    /// Read the pending event
    ///
    /// Clears it back to `Idle` unless the button is being held.
    pub fn take_event(&mut self) -> ButtonEvent {
        let event = self.value;
        if event != ButtonEvent::Held {
            self.value = ButtonEvent::Idle;
        }
        event
    }

    /// Peek at the pending event without consuming it
    pub fn peek(&self) -> ButtonEvent {
        self.value
    }
}
