//! Local directory source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::{check_file_name, ShardSource};
use crate::error::SearchError;

/// Reads index files from a search directory on disk.
#[derive(Debug, Clone)]
pub struct DirShardSource {
    dir: PathBuf,
}

impl DirShardSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ShardSource for DirShardSource {
    async fn fetch(&self, file_name: &str) -> Result<String, SearchError> {
        check_file_name(file_name)?;
        let path = self.dir.join(file_name);
        debug!(path = %path.display(), "Reading index file");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SearchError::fetch(file_name, e))
    }

    fn is_local(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prefixes.txt"), "s1;SALT;SKIN").unwrap();

        let source = DirShardSource::new(dir.path());
        assert!(source.is_local());
        assert_eq!(source.fetch("prefixes.txt").await.unwrap(), "s1;SALT;SKIN");
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirShardSource::new(dir.path());
        let err = source.fetch("ids.txt").await.unwrap_err();
        assert!(matches!(err, SearchError::Fetch { ref file, .. } if file == "ids.txt"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirShardSource::new(dir.path().join("de_search"));
        let err = source.fetch("../menu.json").await.unwrap_err();
        assert_eq!(err, SearchError::InvalidFileName("../menu.json".to_string()));
    }
}
