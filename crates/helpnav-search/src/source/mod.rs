//! Index file sources.
//!
//! The engine reads `prefixes.txt`, shard files and `ids.txt` through a
//! [`ShardSource`], so the same search runs against a local help directory,
//! a web server, or an in-memory fixture.

mod dir;
mod http;
mod memory;

pub use dir::DirShardSource;
pub use http::HttpShardSource;
pub use memory::MemoryShardSource;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use helpnav_types::Settings;

use crate::error::SearchError;

/// Asynchronous reader of search index files.
#[async_trait]
pub trait ShardSource: Send + Sync {
    /// Read an index file by name, relative to the search directory.
    async fn fetch(&self, file_name: &str) -> Result<String, SearchError>;

    /// Whether files come from the local filesystem.
    fn is_local(&self) -> bool;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Reject names that would leave the search directory.
pub(crate) fn check_file_name(file_name: &str) -> Result<(), SearchError> {
    let bad = file_name.is_empty()
        || file_name.contains(['/', '\\'])
        || file_name == ".."
        || file_name.starts_with('.');
    if bad {
        return Err(SearchError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

/// Build the source for the configured site root.
pub fn source_from_settings(settings: &Settings) -> Result<Arc<dyn ShardSource>, SearchError> {
    if settings.is_remote_site() {
        let base = format!(
            "{}/{}/",
            settings.site_root.trim_end_matches('/'),
            settings.search_dir.trim_matches('/')
        );
        let source = HttpShardSource::new(&base, Duration::from_secs(settings.request_timeout_secs))?;
        return Ok(Arc::new(source));
    }

    let dir = settings
        .site_dir()
        .ok_or_else(|| SearchError::Config(format!("not a local site: {}", settings.site_root)))?
        .join(&settings.search_dir);
    Ok(Arc::new(DirShardSource::new(dir)))
}
