//! Reading the menu and keyword index data of a help site.
//!
//! A site root is either a directory or an http(s) URL; data files are read
//! from disk or fetched relative to the root accordingly.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use helpnav_search::{HttpShardSource, ShardSource};
use helpnav_toc::{KeywordIndex, TopicTree};
use helpnav_types::{IndexData, MenuData, Settings};

/// Read a site data file named by a setting.
///
/// Local paths that are absolute are used as they are; everything else is
/// relative to the site root.
pub async fn read_site_file(settings: &Settings, file: &str) -> Result<String> {
    if settings.is_remote_site() {
        let timeout = Duration::from_secs(settings.request_timeout_secs);
        let source = HttpShardSource::new(&settings.site_root, timeout)
            .with_context(|| format!("Invalid site root {:?}", settings.site_root))?;
        debug!(site = %source.base_url(), file, "Fetching site data");
        return source
            .fetch(file)
            .await
            .with_context(|| format!("Failed to fetch {} from {}", file, source.base_url()));
    }

    let path = settings.resolve_data_path(file);
    debug!(path = ?path, "Reading site data");
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {:?}", path))
}

/// Load and build the topic tree.
pub async fn load_tree(settings: &Settings) -> Result<TopicTree> {
    let text = read_site_file(settings, &settings.menu_data)
        .await
        .context("Failed to load menu data")?;
    let menu = MenuData::from_json(&text)
        .with_context(|| format!("Failed to parse {}", settings.menu_data))?;
    TopicTree::build(&menu).with_context(|| format!("Invalid menu data in {}", settings.menu_data))
}

/// Load and build the keyword index for `tree`.
pub async fn load_keywords(settings: &Settings, tree: &TopicTree) -> Result<KeywordIndex> {
    let text = read_site_file(settings, &settings.index_data)
        .await
        .context("Failed to load keyword index")?;
    let data = IndexData::from_json(&text)
        .with_context(|| format!("Failed to parse {}", settings.index_data))?;
    KeywordIndex::build(tree, &data)
        .with_context(|| format!("Invalid keyword index in {}", settings.index_data))
}
