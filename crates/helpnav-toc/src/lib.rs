//! Topic tree and keyword index library for helpnav.
//!
//! Provides:
//! - Topic tree arena built from flat menu arrays
//! - Keyword index with counting-sort inversion of topic keywords
//! - Navigation open/closed state and the nav item view model

pub mod error;
mod hierarchy;
pub mod keywords;
pub mod nav;
pub mod tree;

pub use error::TocError;
pub use keywords::{Keyword, KeywordIndex};
pub use nav::{nav_items, NavItem, OpenState};
pub use tree::{TopicNode, TopicTree};
