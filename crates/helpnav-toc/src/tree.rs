//! Topic tree arena.
//!
//! All nodes live in one contiguous vector in the order of the source menu
//! arrays. Because a node's children occupy a contiguous index range, the
//! children of any node are a plain slice of the arena.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use helpnav_types::MenuData;

use crate::error::TocError;
use crate::hierarchy::build_hierarchy;

/// A node in the topic tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicNode {
    /// Position in the arena (and in the source arrays)
    pub index: usize,

    /// Topic title
    pub title: String,

    /// Page link
    pub link: String,

    /// Distance from the root (root is 0)
    pub depth: usize,

    /// Parent index; None for the root
    pub parent: Option<usize>,

    /// Arena range of this node's children
    pub children: Range<usize>,
}

impl TopicNode {
    /// Number of direct children.
    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Whether this node is the page currently shown.
    pub fn is_selected(&self, current_page: &str) -> bool {
        self.link == current_page
    }
}

/// Read-only topic tree built once from [`MenuData`].
#[derive(Debug, Clone)]
pub struct TopicTree {
    nodes: Vec<TopicNode>,
    has_root_node: bool,
    menu_type: u8,
}

impl TopicTree {
    /// Build the tree in a single pass over the child ranges.
    pub fn build(menu: &MenuData) -> Result<Self, TocError> {
        let len = menu.names.len();
        if len == 0 {
            return Err(TocError::Empty { what: "menu" });
        }
        if menu.links.len() != len {
            return Err(TocError::LengthMismatch {
                what: "links",
                expected: len,
                actual: menu.links.len(),
            });
        }
        if menu.child_start.len() != len {
            return Err(TocError::LengthMismatch {
                what: "child_start",
                expected: len,
                actual: menu.child_start.len(),
            });
        }

        let hierarchy = build_hierarchy("node", "child_end", &menu.child_start, &menu.child_end)?;

        let nodes: Vec<TopicNode> = menu
            .names
            .iter()
            .zip(&menu.links)
            .enumerate()
            .map(|(index, (title, link))| TopicNode {
                index,
                title: title.clone(),
                link: link.clone(),
                depth: hierarchy.depths[index],
                parent: hierarchy.parents[index],
                children: hierarchy.children[index].clone(),
            })
            .collect();

        debug!(
            nodes = nodes.len(),
            max_depth = nodes.iter().map(|n| n.depth).max().unwrap_or(0),
            "Built topic tree"
        );

        Ok(Self {
            nodes,
            has_root_node: menu.has_root_node,
            menu_type: menu.menu_type,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Menu presentation type from the source data.
    pub fn menu_type(&self) -> u8 {
        self.menu_type
    }

    /// Whether this menu type starts fully expanded.
    pub fn opens_all(&self) -> bool {
        self.menu_type == 1 || self.menu_type == 3
    }

    pub fn has_root_node(&self) -> bool {
        self.has_root_node
    }

    pub fn node(&self, index: usize) -> Option<&TopicNode> {
        self.nodes.get(index)
    }

    /// The root node (index 0).
    pub fn root(&self) -> &TopicNode {
        &self.nodes[0]
    }

    /// All nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = &TopicNode> {
        self.nodes.iter()
    }

    /// Direct children of a node; empty for unknown indices.
    pub fn children(&self, index: usize) -> &[TopicNode] {
        match self.nodes.get(index) {
            Some(node) => &self.nodes[node.children.clone()],
            None => &[],
        }
    }

    pub fn children_count(&self, index: usize) -> usize {
        self.nodes.get(index).map_or(0, TopicNode::children_count)
    }

    pub fn parent(&self, index: usize) -> Option<&TopicNode> {
        self.nodes
            .get(index)
            .and_then(|node| node.parent)
            .map(|parent| &self.nodes[parent])
    }

    pub fn depth(&self, index: usize) -> Option<usize> {
        self.nodes.get(index).map(|node| node.depth)
    }

    pub fn is_selected(&self, index: usize, current_page: &str) -> bool {
        self.nodes
            .get(index)
            .is_some_and(|node| node.is_selected(current_page))
    }

    /// Top-level entries shown in the navigation pane.
    ///
    /// When the menu hides its root, the root's children are the top level.
    pub fn root_nodes(&self) -> &[TopicNode] {
        if self.has_root_node {
            std::slice::from_ref(self.root())
        } else {
            self.children(0)
        }
    }

    /// The node whose link matches the current page.
    ///
    /// When several nodes share the link, the last one wins.
    pub fn active_node(&self, current_page: Option<&str>) -> Option<&TopicNode> {
        let page = current_page?;
        self.nodes.iter().rev().find(|node| node.link == page)
    }

    /// Ancestors of a node, nearest first, ending with the root.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = &TopicNode> {
        let mut next = self.nodes.get(index).and_then(|node| node.parent);
        std::iter::from_fn(move || {
            let node = &self.nodes[next?];
            next = node.parent;
            Some(node)
        })
    }
}
