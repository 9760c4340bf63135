//! Text screen model and rendering

mod renderer;
mod screen;

pub use renderer::{Renderer, TallyView, PREVIEW_LEN};
pub use screen::{Screen, LINE_LEN, SCREEN_ROWS};
