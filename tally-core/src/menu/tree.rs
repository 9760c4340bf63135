//! Arena-backed menu tree
//!
//! Nodes live in one fixed-capacity vector and refer to each other by
//! [`NodeId`]. Each node stores its parent and an ordered child list, so
//! re-parenting is two list edits and never invalidates another id.

use heapless::{String, Vec};

use crate::config::MAX_LABEL_LEN;

/// Maximum nodes in one tree
pub const MAX_NODES: usize = 16;

/// Maximum children of one node
pub const MAX_CHILDREN: usize = 8;

/// Maximum options of one choice node (host plus eight cameras)
pub const MAX_OPTIONS: usize = 9;

/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 32;

/// Stable index of a node in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeId(u8);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What committing or selecting a node does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuAction {
    #[default]
    None,
    /// Choice index is the new mode (0 host, k camera k)
    SetMode,
    /// Choice index 0 is on, 1 is off
    SetAudio,
    /// Choice index is the brightness setting
    SetBrightness,
}

/// Node payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Navigable node with ordered children
    Plain { children: Vec<NodeId, MAX_CHILDREN> },
    /// Single-choice selection
    Choice {
        options: Vec<String<MAX_LABEL_LEN>, MAX_OPTIONS>,
        selected: usize,
    },
}

/// One menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuNode {
    pub name: String<MAX_LABEL_LEN>,
    pub description: Option<String<MAX_DESCRIPTION_LEN>>,
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub action: MenuAction,
    /// Choice nodes that are not modifiable can be browsed but not edited
    pub modifiable: bool,
}

impl MenuNode {
    fn plain(name: &str) -> Self {
        Self {
            name: truncated(name),
            description: None,
            kind: NodeKind::Plain {
                children: Vec::new(),
            },
            parent: None,
            action: MenuAction::None,
            modifiable: true,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self.kind, NodeKind::Choice { .. })
    }

    /// Child ids, empty for choice nodes
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Plain { children } => children,
            NodeKind::Choice { .. } => &[],
        }
    }

    /// Option labels, empty for plain nodes
    pub fn options(&self) -> &[String<MAX_LABEL_LEN>] {
        match &self.kind {
            NodeKind::Choice { options, .. } => options,
            NodeKind::Plain { .. } => &[],
        }
    }

    /// Current choice index
    pub fn selected(&self) -> Option<usize> {
        match self.kind {
            NodeKind::Choice { selected, .. } => Some(selected),
            NodeKind::Plain { .. } => None,
        }
    }

    /// Label of the current choice
    pub fn selected_label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Choice { options, selected } => options.get(*selected).map(|s| s.as_str()),
            NodeKind::Plain { .. } => None,
        }
    }
}

/// Errors from tree mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuError {
    /// Id does not name a node, or the node is not a child of the parent
    NotFound,
    /// Node, child list or option list is at capacity
    Full,
    /// Attaching would make a node its own ancestor
    Cycle,
    /// The root cannot be re-parented or turned into a choice
    Root,
    /// Choice nodes have no children; nodes with children are not choices
    KindMismatch,
    /// A choice needs at least one option
    NoOptions,
    /// Choice index beyond the option list
    OptionOutOfRange,
}

/// Menu hierarchy with exactly one root
#[derive(Debug, Clone)]
pub struct MenuTree {
    nodes: Vec<MenuNode, MAX_NODES>,
}

impl MenuTree {
    /// Create a tree holding only a plain root
    pub fn new(root_name: &str) -> Self {
        let mut nodes = Vec::new();
        // Capacity is non-zero
        let _ = nodes.push(MenuNode::plain(root_name));
        Self { nodes }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&MenuNode> {
        self.nodes.get(id.index())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MenuNode, MenuError> {
        self.nodes.get_mut(id.index()).ok_or(MenuError::NotFound)
    }

    /// Create a detached plain node
    pub fn create_node(&mut self, name: &str) -> Result<NodeId, MenuError> {
        let id = NodeId(self.nodes.len() as u8);
        self.nodes
            .push(MenuNode::plain(name))
            .map_err(|_| MenuError::Full)?;
        Ok(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children())
    }

    /// Position of `child` in `parent`'s child list
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// A child that already has a parent is detached from it first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), MenuError> {
        if child == self.root() {
            return Err(MenuError::Root);
        }
        self.node(child).ok_or(MenuError::NotFound)?;
        match self.node(parent).map(|n| &n.kind) {
            None => return Err(MenuError::NotFound),
            Some(NodeKind::Choice { .. }) => return Err(MenuError::KindMismatch),
            Some(NodeKind::Plain { children }) if children.is_full() => {
                if !children.contains(&child) {
                    return Err(MenuError::Full);
                }
            }
            Some(NodeKind::Plain { .. }) => {}
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(MenuError::Cycle);
        }

        if let Some(old_parent) = self.parent(child) {
            self.detach(old_parent, child);
        }
        if let NodeKind::Plain { children } = &mut self.node_mut(parent)?.kind {
            children.push(child).map_err(|_| MenuError::Full)?;
        }
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), MenuError> {
        if self.parent(child) != Some(parent) {
            return Err(MenuError::NotFound);
        }
        self.detach(parent, child);
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(index) = self.child_index(parent, child) {
            if let Some(NodeKind::Plain { children }) =
                self.nodes.get_mut(parent.index()).map(|n| &mut n.kind)
            {
                children.remove(index);
            }
        }
    }

    /// True if `ancestor` is `node` or above it
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        // Bounded walk, a corrupt parent chain cannot loop forever
        for _ in 0..=self.nodes.len() {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.parent(id),
                None => return false,
            }
        }
        true
    }

    /// Turn `id` into a choice node with the given options
    pub fn set_choice(
        &mut self,
        id: NodeId,
        options: &[&str],
        selected: usize,
    ) -> Result<(), MenuError> {
        if id == self.root() {
            return Err(MenuError::Root);
        }
        if !self.children(id).is_empty() {
            return Err(MenuError::KindMismatch);
        }
        if options.is_empty() {
            return Err(MenuError::NoOptions);
        }
        if selected >= options.len() {
            return Err(MenuError::OptionOutOfRange);
        }

        let mut labels = Vec::new();
        for option in options {
            labels.push(truncated(option)).map_err(|_| MenuError::Full)?;
        }
        self.node_mut(id)?.kind = NodeKind::Choice {
            options: labels,
            selected,
        };
        Ok(())
    }

    /// Append one option to a choice node
    pub fn add_option(&mut self, id: NodeId, label: &str) -> Result<(), MenuError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Choice { options, .. } => {
                options.push(truncated(label)).map_err(|_| MenuError::Full)
            }
            NodeKind::Plain { .. } => Err(MenuError::KindMismatch),
        }
    }

    /// Change the current choice
    pub fn set_selection(&mut self, id: NodeId, index: usize) -> Result<(), MenuError> {
        match &mut self.node_mut(id)?.kind {
            NodeKind::Choice { options, selected } => {
                if index >= options.len() {
                    return Err(MenuError::OptionOutOfRange);
                }
                *selected = index;
                Ok(())
            }
            NodeKind::Plain { .. } => Err(MenuError::KindMismatch),
        }
    }

    pub fn set_description(&mut self, id: NodeId, description: &str) -> Result<(), MenuError> {
        let mut text = String::new();
        for ch in description.chars() {
            if text.push(ch).is_err() {
                break;
            }
        }
        self.node_mut(id)?.description = Some(text);
        Ok(())
    }

    pub fn set_action(&mut self, id: NodeId, action: MenuAction) -> Result<(), MenuError> {
        self.node_mut(id)?.action = action;
        Ok(())
    }

    pub fn set_modifiable(&mut self, id: NodeId, modifiable: bool) -> Result<(), MenuError> {
        self.node_mut(id)?.modifiable = modifiable;
        Ok(())
    }

    /// First node carrying `action`
    pub fn find_action(&self, action: MenuAction) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.action == action)
            .map(|i| NodeId(i as u8))
    }
}

fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
