//! Keyword index.
//!
//! The source data lists, per topic, the keywords that annotate it. The
//! navigation pane needs the opposite direction (per keyword, the topics it
//! points at), so the index is inverted once at load time with a counting
//! sort: count references per keyword, prefix-sum the counts into write
//! offsets, then scatter topic indices into place. Topics keep their
//! original order inside every keyword's slice.

use std::ops::Range;

use serde::Serialize;
use tracing::debug;

use helpnav_types::IndexData;

use crate::error::TocError;
use crate::hierarchy::build_hierarchy;
use crate::tree::{TopicNode, TopicTree};

/// A keyword in the keyword tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    /// Position in the keyword arena
    pub index: usize,

    /// Keyword text
    pub title: String,

    /// Distance from the root keyword
    pub depth: usize,

    /// Parent keyword; None for the root
    pub parent: Option<usize>,

    /// Arena range of child keywords
    pub children: Range<usize>,

    /// Range into the inverted keyword-to-topic array
    pub node_refs: Range<usize>,
}

impl Keyword {
    /// Number of child keywords.
    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// Every keyword except the invisible root is selectable.
    pub fn is_active(&self) -> bool {
        self.index != 0
    }
}

/// Invert per-topic keyword lists into per-keyword topic lists.
///
/// `node_ranges[i]` is topic `i`'s slice of `node_keywords`. Returns the
/// flat keyword-to-topic array and each keyword's range into it. Runs in
/// O(keywords + references) without comparisons. Callers validate that
/// every referenced keyword is below `keyword_count` and every range lies
/// inside `node_keywords`.
pub(crate) fn invert_node_keywords(
    keyword_count: usize,
    node_keywords: &[usize],
    node_ranges: &[Range<usize>],
) -> (Vec<usize>, Vec<Range<usize>>) {
    // write_pos[k + 1] counts references to keyword k
    let mut write_pos = vec![0usize; keyword_count + 1];
    for range in node_ranges {
        for &keyword in &node_keywords[range.clone()] {
            write_pos[keyword + 1] += 1;
        }
    }
    for k in 1..write_pos.len() {
        write_pos[k] += write_pos[k - 1];
    }

    let starts: Vec<usize> = write_pos[..keyword_count].to_vec();
    let mut keyword_nodes = vec![0usize; write_pos[keyword_count]];

    for (node, range) in node_ranges.iter().enumerate() {
        for &keyword in &node_keywords[range.clone()] {
            keyword_nodes[write_pos[keyword]] = node;
            write_pos[keyword] += 1;
        }
    }

    let ranges = starts
        .into_iter()
        .zip(&write_pos[..keyword_count])
        .map(|(start, &end)| start..end)
        .collect();

    (keyword_nodes, ranges)
}

/// Read-only keyword index built once from [`IndexData`].
#[derive(Debug, Clone, Default)]
pub struct KeywordIndex {
    keywords: Vec<Keyword>,
    keyword_nodes: Vec<usize>,
    node_keywords: Vec<usize>,
    node_ranges: Vec<Range<usize>>,
}

impl KeywordIndex {
    /// Build the keyword tree and the inverted keyword-to-topic table.
    ///
    /// A site without a keyword index ships empty arrays; that yields an
    /// empty index rather than an error.
    pub fn build(tree: &TopicTree, data: &IndexData) -> Result<Self, TocError> {
        if data.is_empty() && data.node_keywords.is_empty() {
            return Ok(Self {
                node_ranges: vec![0..0; tree.len()],
                ..Self::default()
            });
        }

        let keyword_count = data.keyword_names.len();
        if data.keyword_child_start.len() != keyword_count {
            return Err(TocError::LengthMismatch {
                what: "keyword_child_start",
                expected: keyword_count,
                actual: data.keyword_child_start.len(),
            });
        }
        let hierarchy = build_hierarchy(
            "keyword",
            "keyword_child_end",
            &data.keyword_child_start,
            &data.keyword_child_end,
        )?;

        let node_ranges = node_keyword_ranges(tree.len(), data)?;
        for (node, range) in node_ranges.iter().enumerate() {
            if let Some(&keyword) = data.node_keywords[range.clone()]
                .iter()
                .find(|&&k| k >= keyword_count)
            {
                return Err(TocError::KeywordOutOfRange {
                    node,
                    keyword,
                    len: keyword_count,
                });
            }
        }

        let (keyword_nodes, ref_ranges) =
            invert_node_keywords(keyword_count, &data.node_keywords, &node_ranges);

        let keywords: Vec<Keyword> = data
            .keyword_names
            .iter()
            .zip(ref_ranges)
            .enumerate()
            .map(|(index, (title, node_refs))| Keyword {
                index,
                title: title.clone(),
                depth: hierarchy.depths[index],
                parent: hierarchy.parents[index],
                children: hierarchy.children[index].clone(),
                node_refs,
            })
            .collect();

        debug!(
            keywords = keywords.len(),
            references = keyword_nodes.len(),
            "Built keyword index"
        );

        Ok(Self {
            keywords,
            keyword_nodes,
            node_keywords: data.node_keywords.clone(),
            node_ranges,
        })
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn keyword(&self, index: usize) -> Option<&Keyword> {
        self.keywords.get(index)
    }

    /// The root keyword, if the index has any keywords.
    pub fn root(&self) -> Option<&Keyword> {
        self.keywords.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn children(&self, index: usize) -> &[Keyword] {
        match self.keywords.get(index) {
            Some(keyword) => &self.keywords[keyword.children.clone()],
            None => &[],
        }
    }

    /// Child keywords ordered by case-insensitive title.
    pub fn children_sorted(&self, index: usize) -> Vec<&Keyword> {
        let mut result: Vec<&Keyword> = self.children(index).iter().collect();
        result.sort_by_cached_key(|keyword| keyword.title.to_lowercase());
        result
    }

    pub fn children_count(&self, index: usize) -> usize {
        self.keywords.get(index).map_or(0, Keyword::children_count)
    }

    pub fn parent(&self, index: usize) -> Option<&Keyword> {
        self.keywords
            .get(index)
            .and_then(|keyword| keyword.parent)
            .map(|parent| &self.keywords[parent])
    }

    pub fn depth(&self, index: usize) -> Option<usize> {
        self.keywords.get(index).map(|keyword| keyword.depth)
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.keywords.get(index).is_some_and(Keyword::is_active)
    }

    /// Topic indices annotated by a keyword, in topic order.
    pub fn nodes(&self, index: usize) -> &[usize] {
        match self.keywords.get(index) {
            Some(keyword) => &self.keyword_nodes[keyword.node_refs.clone()],
            None => &[],
        }
    }

    /// Topics annotated by a keyword, resolved against the tree.
    pub fn topics<'a>(
        &'a self,
        index: usize,
        tree: &'a TopicTree,
    ) -> impl Iterator<Item = &'a TopicNode> + 'a {
        self.nodes(index)
            .iter()
            .filter_map(move |&node| tree.node(node))
    }

    /// Keywords annotating a topic, in source order.
    pub fn keywords_of(&self, node: usize) -> impl Iterator<Item = &Keyword> {
        let slice: &[usize] = match self.node_ranges.get(node) {
            Some(range) => &self.node_keywords[range.clone()],
            None => &[],
        };
        slice
            .iter()
            .filter_map(move |&keyword| self.keywords.get(keyword))
    }
}

/// Per-topic ranges into `node_keywords`, validated against its length.
fn node_keyword_ranges(node_count: usize, data: &IndexData) -> Result<Vec<Range<usize>>, TocError> {
    if data.node_keywords_start.len() != node_count {
        return Err(TocError::LengthMismatch {
            what: "node_keywords_start",
            expected: node_count,
            actual: data.node_keywords_start.len(),
        });
    }
    if data.node_keywords_end.len() != node_count {
        return Err(TocError::LengthMismatch {
            what: "node_keywords_end",
            expected: node_count,
            actual: data.node_keywords_end.len(),
        });
    }

    let len = data.node_keywords.len();
    data.node_keywords_start
        .iter()
        .zip(&data.node_keywords_end)
        .enumerate()
        .map(|(node, (&start, &end))| {
            if start >= end {
                Ok(0..0)
            } else if end > len {
                Err(TocError::KeywordRangeOutOfBounds {
                    node,
                    start,
                    end,
                    len,
                })
            } else {
                Ok(start..end)
            }
        })
        .collect()
}
