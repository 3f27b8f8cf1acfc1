//! Errors raised while building the topic tree and keyword index.

use thiserror::Error;

/// Structural problems in menu or index data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TocError {
    #[error("{what} has no entries")]
    Empty { what: &'static str },

    #[error("{what} has {actual} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{kind} {parent} lists child {child}, but only {len} entries exist")]
    ChildOutOfRange {
        kind: &'static str,
        parent: usize,
        child: usize,
        len: usize,
    },

    #[error("{kind} {parent} lists child {child}, which does not come after it")]
    ChildBeforeParent {
        kind: &'static str,
        parent: usize,
        child: usize,
    },

    #[error("{kind} {node} is listed as a child of both {first} and {second}")]
    MultipleParents {
        kind: &'static str,
        node: usize,
        first: usize,
        second: usize,
    },

    #[error("{kind} {node} is not reachable from the root")]
    Orphan { kind: &'static str, node: usize },

    #[error("topic {node} references keyword {keyword}, but only {len} keywords exist")]
    KeywordOutOfRange {
        node: usize,
        keyword: usize,
        len: usize,
    },

    #[error("topic {node} keyword range {start}..{end} exceeds {len} entries")]
    KeywordRangeOutOfBounds {
        node: usize,
        start: usize,
        end: usize,
        len: usize,
    },
}
