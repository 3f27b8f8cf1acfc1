//! Parent/depth computation shared by the topic tree and the keyword tree.

use std::ops::Range;

use crate::error::TocError;

/// Parent, depth and child range of every entry of a flat tree.
#[derive(Debug, Clone)]
pub(crate) struct Hierarchy {
    pub parents: Vec<Option<usize>>,
    pub depths: Vec<usize>,
    pub children: Vec<Range<usize>>,
}

/// Build parent links and depths from child ranges.
///
/// Entry 0 is the root. Entries are visited in index order, so every child
/// must come after its parent for its depth to be known when assigned.
/// A range with `start >= end` simply means no children. `end_field` names
/// the `child_end` array in length errors.
pub(crate) fn build_hierarchy(
    kind: &'static str,
    end_field: &'static str,
    child_start: &[usize],
    child_end: &[usize],
) -> Result<Hierarchy, TocError> {
    let len = child_start.len();
    if child_end.len() != len {
        return Err(TocError::LengthMismatch {
            what: end_field,
            expected: len,
            actual: child_end.len(),
        });
    }

    let mut parents: Vec<Option<usize>> = vec![None; len];
    let mut depths = vec![0usize; len];
    let mut children = Vec::with_capacity(len);

    for parent in 0..len {
        let (start, end) = (child_start[parent], child_end[parent]);
        if start >= end {
            children.push(0..0);
            continue;
        }
        if end > len {
            return Err(TocError::ChildOutOfRange {
                kind,
                parent,
                child: end - 1,
                len,
            });
        }
        if start <= parent {
            return Err(TocError::ChildBeforeParent {
                kind,
                parent,
                child: start,
            });
        }

        for child in start..end {
            if let Some(first) = parents[child] {
                return Err(TocError::MultipleParents {
                    kind,
                    node: child,
                    first,
                    second: parent,
                });
            }
            parents[child] = Some(parent);
            depths[child] = depths[parent] + 1;
        }
        children.push(start..end);
    }

    if let Some(node) = (1..len).find(|&i| parents[i].is_none()) {
        return Err(TocError::Orphan { kind, node });
    }

    Ok(Hierarchy {
        parents,
        depths,
        children,
    })
}
