//! End-to-end test infrastructure for helpnav.
//!
//! Provides a TestHarness that writes a complete help site (menu, keyword
//! index and sharded search index) to a temp directory, and can serve the
//! same site over HTTP.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use helpnav_search::{DirShardSource, HttpShardSource, SearchEngine, IDS_FILE, PREFIXES_FILE};
use helpnav_toc::{KeywordIndex, TopicTree};
use helpnav_types::{IndexData, MenuData, Settings};

/// Support link used by every harness engine.
pub const SUPPORT_LINK: &str = "mailto:support@example.com";

/// A page of the fixture site and the text indexed for it.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub title: &'static str,
    pub link: &'static str,
    pub text: &'static str,
}

/// Pages in search id order (id = position + 1).
pub const PAGES: [Page; 6] = [
    Page {
        title: "Installing on Linux",
        link: "install-linux.htm",
        text: "install the package on linux with apt or rpm",
    },
    Page {
        title: "Installing on Windows",
        link: "install-windows.htm",
        text: "install the package on windows with the installer",
    },
    Page {
        title: "Configuration file",
        link: "config.htm",
        text: "the configuration file controls logging and the server port",
    },
    Page {
        title: "Command line",
        link: "cli.htm",
        text: "run the server from the command line with a config file",
    },
    Page {
        title: "Cats",
        link: "cats.htm",
        text: "cat care and feeding",
    },
    Page {
        title: "Cats and dogs",
        link: "pets.htm",
        text: "cat and dog together",
    },
];

/// Topic tree of the fixture site.
///
/// ```text
/// 0 Manual
/// ├── 1 Getting Started
/// │   ├── 3 Installing on Linux
/// │   └── 4 Installing on Windows
/// └── 2 Reference
///     ├── 5 Configuration file
///     ├── 6 Command line
///     └── 7 Pets
///         ├── 8 Cats
///         └── 9 Cats and dogs
/// ```
pub fn menu_fixture() -> MenuData {
    MenuData {
        names: [
            "Manual",
            "Getting Started",
            "Reference",
            "Installing on Linux",
            "Installing on Windows",
            "Configuration file",
            "Command line",
            "Pets",
            "Cats",
            "Cats and dogs",
        ]
        .map(String::from)
        .to_vec(),
        links: [
            "index.htm",
            "start.htm",
            "reference.htm",
            "install-linux.htm",
            "install-windows.htm",
            "config.htm",
            "cli.htm",
            "pets-index.htm",
            "cats.htm",
            "pets.htm",
        ]
        .map(String::from)
        .to_vec(),
        child_start: vec![1, 3, 5, 0, 0, 0, 0, 8, 0, 0],
        child_end: vec![3, 5, 8, 0, 0, 0, 0, 10, 0, 0],
        has_root_node: true,
        menu_type: 0,
    }
}

/// Keyword index of the fixture site.
///
/// ```text
/// (root)
/// ├── install      -> 3, 4
/// │   ├── windows  -> 4
/// │   └── linux    -> 3
/// ├── Configuration -> 5, 6
/// └── animals      -> 8, 9
/// ```
pub fn index_fixture() -> IndexData {
    IndexData {
        keyword_names: [
            "",
            "install",
            "Configuration",
            "animals",
            "windows",
            "linux",
        ]
        .map(String::from)
        .to_vec(),
        keyword_child_start: vec![1, 4, 0, 0, 0, 0],
        keyword_child_end: vec![4, 6, 0, 0, 0, 0],
        // Topic 3: install, linux; 4: install, windows; 5, 6: Configuration;
        // 8, 9: animals
        node_keywords: vec![1, 5, 1, 4, 2, 2, 3, 3],
        node_keywords_start: vec![0, 0, 0, 0, 2, 4, 5, 6, 6, 7],
        node_keywords_end: vec![0, 0, 0, 2, 4, 5, 6, 6, 7, 8],
    }
}

/// Build a sharded search index for `pages`.
///
/// Words are upper-cased and grouped into shards of at most
/// `words_per_shard` words that never span two leading letters. Returns
/// `(file name, contents)` pairs including `prefixes.txt` and `ids.txt`.
pub fn build_search_index(pages: &[Page], words_per_shard: usize) -> Vec<(String, String)> {
    let mut words: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for (i, page) in pages.iter().enumerate() {
        for word in page.text.split_whitespace() {
            words.entry(word.to_uppercase()).or_default().insert(i + 1);
        }
    }

    let mut by_lead: BTreeMap<char, Vec<(String, BTreeSet<usize>)>> = BTreeMap::new();
    for (word, ids) in words {
        if let Some(lead) = word.chars().next() {
            by_lead.entry(lead).or_default().push((word, ids));
        }
    }

    let mut files = Vec::new();
    let mut prefixes = Vec::new();
    for (lead, entries) in by_lead {
        for (n, chunk) in entries.chunks(words_per_shard.max(1)).enumerate() {
            let name = format!("{}{}", lead.to_ascii_lowercase(), n);
            let first = &chunk[0].0;
            let last = &chunk[chunk.len() - 1].0;
            prefixes.push(format!("{};{};{}", name, first, last));

            let body: Vec<String> = chunk
                .iter()
                .map(|(word, ids)| {
                    let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                    format!("{};{}", word, ids.join(","))
                })
                .collect();
            files.push((format!("{}.txt", name), body.join(";\n")));
        }
    }

    let ids: String = pages
        .iter()
        .map(|page| format!("\n{}\n{}\n", page.title, page.link))
        .collect();

    files.push((PREFIXES_FILE.to_string(), prefixes.join(";\n")));
    files.push((IDS_FILE.to_string(), ids));
    files
}

/// Shared test harness for E2E tests.
///
/// Writes the fixture site to a temp directory on creation.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    /// Help site root
    pub site_root: PathBuf,
    /// Settings pointing at the site root
    pub settings: Settings,
    /// Search index files as written
    pub search_files: Vec<(String, String)>,
}

impl TestHarness {
    /// Create a harness with three words per shard.
    pub fn new() -> Self {
        Self::with_shard_size(3)
    }

    pub fn with_shard_size(words_per_shard: usize) -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let site_root = temp_dir.path().to_path_buf();
        let settings = Settings {
            site_root: site_root.to_string_lossy().into_owned(),
            support_link: SUPPORT_LINK.to_string(),
            ..Settings::default()
        };

        write_json(&site_root.join(&settings.menu_data), &menu_fixture());
        write_json(&site_root.join(&settings.index_data), &index_fixture());

        let search_dir = site_root.join(&settings.search_dir);
        std::fs::create_dir_all(&search_dir).expect("Failed to create search dir");
        let search_files = build_search_index(&PAGES, words_per_shard);
        for (name, contents) in &search_files {
            std::fs::write(search_dir.join(name), contents).expect("Failed to write index file");
        }

        Self {
            _temp_dir: temp_dir,
            site_root,
            settings,
            search_files,
        }
    }

    pub fn search_dir(&self) -> PathBuf {
        self.site_root.join(&self.settings.search_dir)
    }

    /// Overwrite one search index file.
    pub fn write_search_file(&self, name: &str, contents: &str) {
        std::fs::write(self.search_dir().join(name), contents).expect("Failed to write index file");
    }

    /// Engine reading the site from disk.
    pub fn dir_engine(&self) -> SearchEngine {
        SearchEngine::new(Arc::new(DirShardSource::new(self.search_dir())), SUPPORT_LINK)
    }

    pub fn tree(&self) -> TopicTree {
        let menu = MenuData::load(self.site_root.join(&self.settings.menu_data))
            .expect("Failed to load menu");
        TopicTree::build(&menu).expect("Failed to build tree")
    }

    pub fn keywords(&self, tree: &TopicTree) -> KeywordIndex {
        let data = IndexData::load(self.site_root.join(&self.settings.index_data))
            .expect("Failed to load keyword index");
        KeywordIndex::build(tree, &data).expect("Failed to build keyword index")
    }

    /// Serve the search index over HTTP under `/help/de_search/`.
    pub async fn serve(&self) -> MockServer {
        let server = MockServer::start().await;
        for (name, contents) in &self.search_files {
            Mock::given(method("GET"))
                .and(path(format!("/help/de_search/{}", name)))
                .respond_with(ResponseTemplate::new(200).set_body_string(contents.clone()))
                .mount(&server)
                .await;
        }
        server
    }

    /// Engine reading the site from `server`.
    pub fn http_engine(&self, server: &MockServer) -> SearchEngine {
        let base = format!("{}/help/de_search/", server.uri());
        let source = HttpShardSource::new(&base, std::time::Duration::from_secs(5))
            .expect("Failed to create HTTP source");
        SearchEngine::new(Arc::new(source), SUPPORT_LINK)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) {
    let bytes = serde_json::to_vec_pretty(value).expect("Failed to serialize fixture");
    std::fs::write(path, bytes).expect("Failed to write fixture");
}

/// Titles of a search outcome's hits.
pub fn hit_titles(outcome: &helpnav_search::SearchOutcome) -> Vec<&str> {
    outcome.hits.iter().map(|hit| hit.title.as_str()).collect()
}
