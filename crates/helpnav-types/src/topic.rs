//! Table of contents and keyword index data.
//!
//! A generated help site describes its navigation as flat parallel arrays:
//! node `i` has a name, a link, and a half-open range `child_start[i]..child_end[i]`
//! of child node indices. Node 0 is always the root.
//!
//! The keyword index uses the same layout for the keyword tree, plus a flat
//! `node_keywords` array where topic `i` owns the slice
//! `node_keywords_start[i]..node_keywords_end[i]`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HelpError;

/// Flat description of the topic tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuData {
    /// Node titles
    pub names: Vec<String>,

    /// Node page links (relative file names)
    pub links: Vec<String>,

    /// First child index, per node
    pub child_start: Vec<usize>,

    /// One past the last child index, per node
    pub child_end: Vec<usize>,

    /// When false, the root node is hidden and its children are shown as roots
    #[serde(default = "default_has_root_node")]
    pub has_root_node: bool,

    /// Menu presentation type; types 1 and 3 start fully expanded
    #[serde(default)]
    pub menu_type: u8,
}

fn default_has_root_node() -> bool {
    true
}

impl MenuData {
    /// Number of nodes described (length of `names`).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parse menu data from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HelpError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load menu data from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HelpError> {
        Self::from_json(&std::fs::read_to_string(path.as_ref())?)
    }
}

/// Flat description of the keyword index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexData {
    /// Keyword titles; keyword 0 is the (invisible) root
    pub keyword_names: Vec<String>,

    /// First child keyword index, per keyword
    pub keyword_child_start: Vec<usize>,

    /// One past the last child keyword index, per keyword
    pub keyword_child_end: Vec<usize>,

    /// Keyword ids referenced by topics, concatenated in topic order
    pub node_keywords: Vec<usize>,

    /// Start of each topic's slice of `node_keywords`
    pub node_keywords_start: Vec<usize>,

    /// End of each topic's slice of `node_keywords`
    pub node_keywords_end: Vec<usize>,
}

impl IndexData {
    /// Number of keywords described.
    pub fn len(&self) -> usize {
        self.keyword_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_names.is_empty()
    }

    /// Parse index data from JSON text.
    pub fn from_json(text: &str) -> Result<Self, HelpError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load index data from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HelpError> {
        Self::from_json(&std::fs::read_to_string(path.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_menu_defaults_from_json() {
        let json = r#"{
            "names": ["Root", "Intro"],
            "links": ["index.htm", "intro.htm"],
            "child_start": [1, 0],
            "child_end": [2, 0]
        }"#;
        let menu = MenuData::from_json(json).unwrap();
        assert_eq!(menu.len(), 2);
        assert!(menu.has_root_node);
        assert_eq!(menu.menu_type, 0);
    }

    #[test]
    fn test_invalid_json_rejected() {
        let result = IndexData::from_json("{ \"keyword_names\": 3 }");
        assert!(matches!(result, Err(HelpError::Serialization(_))));
    }

    #[test]
    fn test_index_load_from_file() {
        let index = IndexData {
            keyword_names: vec!["".to_string(), "install".to_string()],
            keyword_child_start: vec![1, 0],
            keyword_child_end: vec![2, 0],
            node_keywords: vec![1],
            node_keywords_start: vec![0],
            node_keywords_end: vec![1],
        };

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&serde_json::to_vec(&index).unwrap()).unwrap();

        let loaded = IndexData::load(file.path()).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_load_missing_file() {
        let result = MenuData::load("/nonexistent/menu.json");
        assert!(matches!(result, Err(HelpError::Io(_))));
    }
}
