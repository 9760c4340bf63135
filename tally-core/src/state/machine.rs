//! State machine definition
//!
//! What the screen shows and how button events are interpreted is a
//! function of the current state.

use super::events::Event;

/// Device states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Splash screen after power-on
    #[default]
    Booting,
    /// Tally view
    Normal,
    /// Moving through a list of nodes
    MenuBrowsing,
    /// Picking an option of a choice node
    MenuEditingChoice,
}

impl DeviceState {
    /// Check if the menu is on screen
    pub fn in_menu(&self) -> bool {
        matches!(self, DeviceState::MenuBrowsing | DeviceState::MenuEditingChoice)
    }

    /// Check if a choice is being edited
    pub fn is_editing(&self) -> bool {
        matches!(self, DeviceState::MenuEditingChoice)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use DeviceState::*;
        use Event::*;

        match (self, event) {
            (Booting, BootComplete) => Normal,
            (Normal, OpenMenu) => MenuBrowsing,
            (MenuBrowsing, ExitMenu) => Normal,
            (MenuBrowsing, BeginEdit) => MenuEditingChoice,
            (MenuEditingChoice, CommitEdit) => MenuBrowsing,

            // Default: stay in current state
            _ => self,
        }
    }
}
