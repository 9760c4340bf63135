//! Text screen buffer
//!
//! The display driver turns this into pixels. Rows are plain text; a row can
//! be highlighted and the whole screen has a background colour.

use heapless::String;

use crate::indicator::LedColor;

/// Text rows on the screen (heading plus five two-row menu entries)
pub const SCREEN_ROWS: usize = 11;

/// Characters per row
pub const LINE_LEN: usize = 22;

/// One frame of text
#[derive(Debug, Clone)]
pub struct Screen {
    lines: [String<LINE_LEN>; SCREEN_ROWS],
    highlights: [bool; SCREEN_ROWS],
    background: LedColor,
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlights: [false; SCREEN_ROWS],
            background: LedColor::Off,
            dirty: true,
        }
    }

    /// Blank every row and reset the background
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.highlights = [false; SCREEN_ROWS];
        self.background = LedColor::Off;
        self.dirty = true;
    }

    /// Set a row, truncating to [`LINE_LEN`] characters
    pub fn set_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            line.clear();
            for ch in text.chars() {
                if line.push(ch).is_err() {
                    break;
                }
            }
            self.dirty = true;
        }
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|s| s.as_str())
    }

    pub fn set_highlight(&mut self, row: usize) {
        if let Some(highlight) = self.highlights.get_mut(row) {
            *highlight = true;
            self.dirty = true;
        }
    }

    pub fn is_highlighted(&self, row: usize) -> bool {
        self.highlights.get(row).copied().unwrap_or(false)
    }

    pub fn set_background(&mut self, color: LedColor) {
        self.background = color;
        self.dirty = true;
    }

    pub fn background(&self) -> LedColor {
        self.background
    }

    /// Same text, highlights and background
    pub fn same_content(&self, other: &Screen) -> bool {
        self.lines == other.lines
            && self.highlights == other.highlights
            && self.background == other.background
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Called after the screen reached the panel
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
