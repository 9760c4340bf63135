//! Menu navigation driven by the single button
//!
//! A click moves the cursor down one row with wrap-around. A hold acts on
//! the row under the cursor: go back, start editing a choice, commit the
//! edit, or enter a node. Holds are edge-latched, so one long press acts
//! once no matter how many `Held` reads it produces.

use super::events::Event;
use super::machine::DeviceState;
use crate::config::{BOOT_DELAY_MS, POWER_OFF_HOLD_MS};
use crate::input::ButtonEvent;
use crate::menu::{MenuAction, MenuTree, NodeId};
use tally_protocol::messages::TEST_ALL;

/// Visible rows when listing options of a choice
pub const CHOICE_VISIBLE_ROWS: usize = 8;

/// Visible rows when listing children of a node
pub const NODE_VISIBLE_ROWS: usize = 5;

/// Cursor position in the current list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Cursor {
    /// Highlighted row; 0 is "back" in node lists
    pub selection: usize,
    /// First visible row
    pub viewport: usize,
}

/// Side effects requested by navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavEffect {
    /// Run a node's action. `manual` is set for user-driven commits.
    Action {
        node: NodeId,
        action: MenuAction,
        manual: bool,
    },
    /// Broadcast a test alert to the slots in `mask`
    SendTest { mask: u8 },
    /// Cut power
    PowerOff,
}

/// Navigation state machine
#[derive(Debug, Clone)]
pub struct NavigationController {
    state: DeviceState,
    state_since_ms: u32,
    current: NodeId,
    cursor: Cursor,
    /// A hold has been acted on and the button is still down
    hold_latched: bool,
    /// Last time the button read as idle
    last_idle_ms: u32,
}

impl NavigationController {
    pub fn new(tree: &MenuTree, now_ms: u32) -> Self {
        Self {
            state: DeviceState::Booting,
            state_since_ms: now_ms,
            current: tree.root(),
            cursor: Cursor::default(),
            hold_latched: false,
            last_idle_ms: now_ms,
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Node whose children (or options, when editing) are listed
    pub fn current_node(&self) -> NodeId {
        self.current
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Rows in the current list: options when editing, else children plus "back"
    pub fn item_count(&self, tree: &MenuTree) -> usize {
        let count = if self.state.is_editing() {
            tree.node(self.current).map_or(0, |n| n.options().len())
        } else {
            tree.children(self.current).len() + 1
        };
        debug_assert!(count >= 1, "menu list without rows");
        count
    }

    /// Rows that fit on screen for the current list
    pub fn visible_rows(&self, tree: &MenuTree) -> usize {
        if self.lists_options(tree) {
            CHOICE_VISIBLE_ROWS
        } else {
            NODE_VISIBLE_ROWS
        }
    }

    fn lists_options(&self, tree: &MenuTree) -> bool {
        tree.node(self.current).is_some_and(|n| n.is_choice())
    }

    fn apply(&mut self, event: Event, now_ms: u32) {
        let next = self.state.transition(event);
        if next != self.state {
            debug!("Navigation state change on {}", event);
            self.state = next;
            self.state_since_ms = now_ms;
        }
    }

    /// Returns true exactly once per hold
    fn take_hold(&mut self, event: ButtonEvent) -> bool {
        if event == ButtonEvent::Held {
            if !self.hold_latched {
                self.hold_latched = true;
                return true;
            }
        } else {
            self.hold_latched = false;
        }
        false
    }

    /// Process one button read
    ///
    /// `is_host` enables the test-broadcast click in the normal view.
    pub fn handle(
        &mut self,
        tree: &mut MenuTree,
        event: ButtonEvent,
        now_ms: u32,
        is_host: bool,
    ) -> Option<NavEffect> {
        if event == ButtonEvent::Held
            && now_ms.wrapping_sub(self.last_idle_ms) > POWER_OFF_HOLD_MS
        {
            info!("Power-off hold detected");
            return Some(NavEffect::PowerOff);
        } else if event == ButtonEvent::Idle {
            self.last_idle_ms = now_ms;
        }

        match self.state {
            DeviceState::Booting => {
                if now_ms.wrapping_sub(self.state_since_ms) >= BOOT_DELAY_MS {
                    self.apply(Event::BootComplete, now_ms);
                }
                None
            }
            DeviceState::Normal => {
                if self.take_hold(event) {
                    self.current = tree.root();
                    self.cursor = Cursor::default();
                    self.apply(Event::OpenMenu, now_ms);
                    None
                } else if is_host && event == ButtonEvent::Clicked {
                    Some(NavEffect::SendTest { mask: TEST_ALL })
                } else {
                    None
                }
            }
            DeviceState::MenuBrowsing | DeviceState::MenuEditingChoice => {
                if self.take_hold(event) {
                    self.select(tree, now_ms)
                } else {
                    if matches!(event, ButtonEvent::Clicked | ButtonEvent::DoubleClicked) {
                        self.advance(tree);
                    }
                    None
                }
            }
        }
    }

    /// Move the cursor down one row, wrapping to the top
    fn advance(&mut self, tree: &MenuTree) {
        let count = self.item_count(tree);
        if count > 1 {
            self.cursor.selection = (self.cursor.selection + 1) % count;
            self.scroll(tree);
        }
    }

    /// Act on the row under the cursor
    fn select(&mut self, tree: &mut MenuTree, now_ms: u32) -> Option<NavEffect> {
        if self.state.is_editing() {
            return self.commit(tree, now_ms);
        }

        if self.cursor.selection == 0 {
            match tree.parent(self.current) {
                None => self.apply(Event::ExitMenu, now_ms),
                Some(parent) => {
                    self.current = parent;
                    self.cursor = Cursor::default();
                }
            }
            return None;
        }

        let child = *tree.children(self.current).get(self.cursor.selection - 1)?;
        let node = tree.node(child)?;
        let mut effect = None;

        if node.is_choice() {
            if node.modifiable {
                self.cursor = Cursor {
                    selection: node.selected().unwrap_or(0),
                    viewport: 0,
                };
                self.current = child;
                self.apply(Event::BeginEdit, now_ms);
            }
        } else {
            if node.action != MenuAction::None {
                effect = Some(NavEffect::Action {
                    node: child,
                    action: node.action,
                    manual: true,
                });
            }
            if !node.children().is_empty() {
                self.current = child;
                self.cursor = Cursor::default();
            }
        }

        self.scroll(tree);
        effect
    }

    /// Store the edited choice and return to the parent list
    fn commit(&mut self, tree: &mut MenuTree, now_ms: u32) -> Option<NavEffect> {
        let node = self.current;
        if tree.set_selection(node, self.cursor.selection).is_err() {
            warn!("Choice index {} out of range", self.cursor.selection);
        }
        let action = tree.node(node).map_or(MenuAction::None, |n| n.action);

        let parent = tree.parent(node).unwrap_or(tree.root());
        self.cursor = Cursor {
            selection: tree.child_index(parent, node).map_or(0, |i| i + 1),
            viewport: 0,
        };
        self.current = parent;
        self.apply(Event::CommitEdit, now_ms);
        self.scroll(tree);

        Some(NavEffect::Action {
            node,
            action,
            manual: true,
        })
    }

    /// Keep the cursor inside the visible window
    fn scroll(&mut self, tree: &MenuTree) {
        let threshold = self.visible_rows(tree) - 1;
        let selection = self.cursor.selection;
        if selection < self.cursor.viewport {
            self.cursor.viewport = selection;
        } else if selection - self.cursor.viewport > threshold {
            self.cursor.viewport = selection - threshold;
        }
    }
}
