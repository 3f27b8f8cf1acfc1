//! Navigation pane state.
//!
//! The pane keeps one open/closed flag per topic node. The flags start from
//! a default derived from the menu type and tree shape; only the difference
//! from that default travels in the page URL, which keeps the encoded state
//! short for the common case of a few toggled nodes.

use serde::Serialize;
use tracing::debug;

use crate::tree::{TopicNode, TopicTree};

/// Per-node open/closed bitmap for the topic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenState {
    bits: Vec<bool>,
}

impl OpenState {
    /// Wrap an explicit bitmap.
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self { bits }
    }

    /// Initial state for a tree.
    ///
    /// Menu types 1 and 3 start fully expanded. Otherwise nodes down to
    /// depth 1 are open when there is a single top-level entry, and only the
    /// root when there are several.
    pub fn default_for(tree: &TopicTree) -> Self {
        if tree.opens_all() {
            return Self {
                bits: vec![true; tree.len()],
            };
        }

        let depth_border = if tree.root_nodes().len() <= 1 { 1 } else { 0 };
        Self {
            bits: tree.iter().map(|node| node.depth <= depth_border).collect(),
        }
    }

    /// Rebuild a state from its XOR difference against `default`.
    ///
    /// Missing delta bits count as unchanged; extra bits are ignored.
    pub fn from_delta(default: &OpenState, delta: &[bool]) -> Self {
        let bits = default
            .bits
            .iter()
            .enumerate()
            .map(|(i, &open)| open ^ delta.get(i).copied().unwrap_or(false))
            .collect();
        Self { bits }
    }

    /// XOR difference against `default`, suitable for URL encoding.
    pub fn delta_from(&self, default: &OpenState) -> Vec<bool> {
        self.bits
            .iter()
            .enumerate()
            .map(|(i, &open)| open ^ default.bits.get(i).copied().unwrap_or(false))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Set a node's flag; unknown indices are ignored.
    pub fn set(&mut self, index: usize, open: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = open;
        }
    }

    /// Flip a node's flag and return the new value.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.bits.get_mut(index) {
            Some(bit) => {
                *bit = !*bit;
                *bit
            }
            None => false,
        }
    }

    /// Force open the root and every ancestor of the selected node, so the
    /// current page is always reachable in the pane.
    pub fn validate(&mut self, tree: &TopicTree, selected: Option<usize>) {
        self.set(tree.root().index, true);
        let Some(selected) = selected else {
            return;
        };
        for ancestor in tree.ancestors(selected) {
            self.set(ancestor.index, true);
        }
        debug!(selected, "Opened ancestors of selected topic");
    }
}

/// One row of the navigation pane view model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: String,
    pub link: String,
    pub node_index: usize,
    pub children: Vec<NavItem>,
    /// True when this node and all its ancestors are open
    pub is_visible: bool,
    /// True when this node's link is the current page
    pub is_selected: bool,
}

/// Build the navigation view model from the pane's top-level entries.
pub fn nav_items(tree: &TopicTree, open: &OpenState, current_page: Option<&str>) -> Vec<NavItem> {
    populate(tree, tree.root_nodes(), open, current_page, true)
}

fn populate(
    tree: &TopicTree,
    nodes: &[TopicNode],
    open: &OpenState,
    current_page: Option<&str>,
    parent_visible: bool,
) -> Vec<NavItem> {
    nodes
        .iter()
        .map(|node| {
            let is_visible = parent_visible && open.is_open(node.index);
            NavItem {
                title: node.title.clone(),
                link: node.link.clone(),
                node_index: node.index,
                children: populate(
                    tree,
                    tree.children(node.index),
                    open,
                    current_page,
                    is_visible,
                ),
                is_visible,
                is_selected: current_page.is_some_and(|page| node.is_selected(page)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use helpnav_types::MenuData;

    /// Manual -> { Start -> { Install -> { Linux } }, Reference }
    fn sample_menu() -> MenuData {
        MenuData {
            names: vec![
                "Manual".into(),
                "Start".into(),
                "Reference".into(),
                "Install".into(),
                "Linux".into(),
            ],
            links: vec![
                "index.htm".into(),
                "start.htm".into(),
                "reference.htm".into(),
                "install.htm".into(),
                "linux.htm".into(),
            ],
            child_start: vec![1, 3, 0, 4, 0],
            child_end: vec![3, 4, 0, 5, 0],
            has_root_node: true,
            menu_type: 0,
        }
    }

    #[test]
    fn test_default_single_root() {
        let tree = TopicTree::build(&sample_menu()).unwrap();
        let state = OpenState::default_for(&tree);
        assert_eq!(state.as_bits(), &[true, true, true, false, false]);
    }

    #[test]
    fn test_default_several_roots() {
        let mut menu = sample_menu();
        menu.has_root_node = false;
        let tree = TopicTree::build(&menu).unwrap();
        let state = OpenState::default_for(&tree);
        assert_eq!(state.as_bits(), &[true, false, false, false, false]);
    }

    #[test]
    fn test_default_opens_all() {
        let mut menu = sample_menu();
        menu.menu_type = 3;
        let tree = TopicTree::build(&menu).unwrap();
        let state = OpenState::default_for(&tree);
        assert!(state.as_bits().iter().all(|&b| b));
    }

    #[test]
    fn test_toggle_and_set() {
        let tree = TopicTree::build(&sample_menu()).unwrap();
        let mut state = OpenState::default_for(&tree);
        assert!(state.toggle(3));
        assert!(state.is_open(3));
        assert!(!state.toggle(3));
        state.set(99, true);
        assert!(!state.is_open(99));
        assert!(!state.toggle(99));
    }

    #[test]
    fn test_validate_opens_ancestors() {
        let tree = TopicTree::build(&sample_menu()).unwrap();
        let mut state = OpenState::from_bits(vec![false; 5]);
        let selected = tree.active_node(Some("linux.htm")).map(|n| n.index);
        state.validate(&tree, selected);
        assert_eq!(state.as_bits(), &[true, true, false, true, false]);
    }

    #[test]
    fn test_delta_round_trip() {
        let tree = TopicTree::build(&sample_menu()).unwrap();
        let default = OpenState::default_for(&tree);
        let mut state = default.clone();
        state.toggle(1);
        state.toggle(3);

        let delta = state.delta_from(&default);
        assert_eq!(delta, vec![false, true, false, true, false]);
        assert_eq!(OpenState::from_delta(&default, &delta), state);
    }

    #[test]
    fn test_short_delta_means_unchanged() {
        let default = OpenState::from_bits(vec![true, false, true]);
        let state = OpenState::from_delta(&default, &[true]);
        assert_eq!(state.as_bits(), &[false, false, true]);
    }

    #[test]
    fn test_nav_items_visibility() {
        let tree = TopicTree::build(&sample_menu()).unwrap();
        let mut state = OpenState::default_for(&tree);
        state.set(4, true);

        let items = nav_items(&tree, &state, Some("install.htm"));
        assert_eq!(items.len(), 1);
        let root = &items[0];
        assert!(root.is_visible);

        let start = &root.children[0];
        assert_eq!(start.title, "Start");
        assert!(start.is_visible);

        // Install is closed, so Linux is hidden even though its own flag is set
        let install = &start.children[0];
        assert!(!install.is_visible);
        assert!(install.is_selected);
        assert!(!install.children[0].is_visible);
        assert!(root.children[1].children.is_empty());
    }
}
