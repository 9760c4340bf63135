//! Display driver trait

use crate::render::Screen;

/// Errors that can occur while pushing a frame to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer failed
    Bus,
    /// Panel did not respond in time
    Timeout,
}

/// Trait for the unit's screen
///
/// The core only builds text screens. Fonts, colours and layout in pixels
/// belong to the implementation.
pub trait DisplayDriver {
    /// Draw the complete screen
    fn draw(&mut self, screen: &Screen) -> Result<(), DisplayError>;
}

/// Helper trait for redrawing only when needed
pub trait DisplayExt: DisplayDriver {
    /// Draw `screen` if it changed since the last successful draw
    ///
    /// Returns true if a draw happened.
    fn refresh(&mut self, screen: &mut Screen) -> Result<bool, DisplayError> {
        if !screen.is_dirty() {
            return Ok(false);
        }
        self.draw(screen)?;
        screen.mark_clean();
        Ok(true)
    }
}

// Blanket implementation for all DisplayDriver types
impl<T: DisplayDriver> DisplayExt for T {}
