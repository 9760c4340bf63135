//! Screen rendering
//!
//! Builds a [`Screen`] for each device state. Every render starts from a
//! blank frame; the kept screen is only replaced (and marked dirty) when the
//! new frame differs, so an unchanged view is not redrawn.

use heapless::String;
use tally_protocol::CameraStatus;

use super::screen::{Screen, LINE_LEN, SCREEN_ROWS};
use crate::config::{Mode, FIRMWARE_VERSION};
use crate::indicator::tally_color;
use crate::menu::{MenuNode, MenuTree, NodeKind};
use crate::state::NavigationController;

/// Preview text longer than this is cut and suffixed with ".."
pub const PREVIEW_LEN: usize = 20;

/// Slots per row of the host grid
const GRID_COLUMNS: usize = 4;

/// What the normal view shows
#[derive(Debug, Clone, Copy)]
pub struct TallyView<'a> {
    pub mode: Mode,
    pub own_status: Option<CameraStatus>,
    pub test_active: bool,
    pub statuses: &'a [CameraStatus],
    pub note: &'a str,
}

/// Screen renderer for the device states
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    fn commit(&mut self, next: Screen) {
        if !self.screen.same_content(&next) {
            self.screen = next;
            self.screen.mark_dirty();
        }
    }

    /// Splash screen while booting
    pub fn render_boot(&mut self) {
        let mut next = Screen::new();
        next.set_line(3, "    TALLY");
        let mut version: String<LINE_LEN> = String::new();
        let _ = write_to_string(&mut version, format_args!("     v{}", FIRMWARE_VERSION));
        next.set_line(5, &version);
        self.commit(next);
    }

    /// Normal tally view
    ///
    /// The background carries the tally colour. A host lists every slot as
    /// a grid of `<slot><PGM|PVW|--->` cells.
    pub fn render_normal(&mut self, view: &TallyView<'_>) {
        let mut next = Screen::new();
        next.set_background(tally_color(view.mode, view.own_status, view.test_active));
        next.set_line(0, &view.mode.label());

        match view.mode {
            Mode::Host => {
                for (row, chunk) in view.statuses.chunks(GRID_COLUMNS).enumerate() {
                    let mut line: String<LINE_LEN> = String::new();
                    for (col, status) in chunk.iter().enumerate() {
                        let slot = row * GRID_COLUMNS + col + 1;
                        if col > 0 {
                            let _ = line.push(' ');
                        }
                        let _ = write_to_string(&mut line, format_args!("{}{}", slot, short_name(*status)));
                    }
                    next.set_line(2 + row, &line);
                }
            }
            Mode::Camera(_) => {
                let text = if view.test_active {
                    "TEST"
                } else {
                    match view.own_status {
                        Some(CameraStatus::Program) => "PROGRAM",
                        Some(CameraStatus::Preview) => "PREVIEW",
                        _ => "STANDBY",
                    }
                };
                next.set_line(2, text);
            }
        }

        if !view.note.is_empty() {
            next.set_line(SCREEN_ROWS - 1, view.note);
        }
        self.commit(next);
    }

    /// Menu view of the navigation's current list
    pub fn render_menu(&mut self, tree: &MenuTree, nav: &NavigationController) {
        let mut next = Screen::new();
        let Some(current) = tree.node(nav.current_node()) else {
            self.commit(next);
            return;
        };
        next.set_line(0, &current.name);

        let cursor = nav.cursor();
        let count = nav.item_count(tree);
        let end = count.min(cursor.viewport + nav.visible_rows(tree));

        match &current.kind {
            NodeKind::Choice { options, .. } => {
                for (row, index) in (cursor.viewport..end).enumerate() {
                    let label = options.get(index).map_or("", |s| s.as_str());
                    next.set_line(1 + row, label);
                    if index == cursor.selection {
                        next.set_highlight(1 + row);
                    }
                }
            }
            NodeKind::Plain { children } => {
                for (row, index) in (cursor.viewport..end).enumerate() {
                    let name_row = 1 + row * 2;
                    if index == 0 {
                        next.set_line(name_row, "<Go back");
                    } else if let Some(child) = children.get(index - 1).and_then(|&id| tree.node(id)) {
                        next.set_line(name_row, &child.name);
                        if let Some(text) = preview(child) {
                            next.set_line(name_row + 1, &truncate_preview(text));
                        }
                    }
                    if index == cursor.selection {
                        next.set_highlight(name_row);
                        next.set_highlight(name_row + 1);
                    }
                }
            }
        }
        self.commit(next);
    }
}

fn short_name(status: CameraStatus) -> &'static str {
    match status {
        CameraStatus::Program => "PGM",
        CameraStatus::Preview => "PVW",
        CameraStatus::Standby => "---",
    }
}

/// Second row under a menu entry: description, or the current choice
fn preview(node: &MenuNode) -> Option<&str> {
    match node.kind {
        NodeKind::Choice { .. } => node.selected_label(),
        NodeKind::Plain { .. } => node.description.as_deref(),
    }
}

fn truncate_preview(text: &str) -> String<LINE_LEN> {
    let mut out = String::new();
    for (i, ch) in text.chars().enumerate() {
        if i == PREVIEW_LEN {
            let _ = out.push_str("..");
            break;
        }
        let _ = out.push(ch);
    }
    out
}

/// Helper to write formatted text to a heapless String
fn write_to_string(s: &mut String<LINE_LEN>, args: core::fmt::Arguments<'_>) -> core::fmt::Result {
    use core::fmt::Write;
    s.write_fmt(args)
}
