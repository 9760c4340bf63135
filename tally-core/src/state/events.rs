//! Events that trigger state transitions

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Boot splash time elapsed
    BootComplete,
    /// User held the button in the normal view
    OpenMenu,
    /// User chose "back" at the menu root
    ExitMenu,
    /// User held on a modifiable choice node
    BeginEdit,
    /// User held while editing a choice
    CommitEdit,
}
