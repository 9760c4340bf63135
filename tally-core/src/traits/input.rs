//! Button input trait

/// The single user button
pub trait ButtonInput {
    /// Raw level, true while the button is held down
    fn is_pressed(&mut self) -> bool;
}
