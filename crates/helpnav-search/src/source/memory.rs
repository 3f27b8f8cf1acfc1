//! In-memory source for tests and embedding.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{check_file_name, ShardSource};
use crate::error::SearchError;

/// Serves index files from a map.
///
/// Records every requested name, and can delay individual files so tests can
/// exercise ordering and cancellation.
#[derive(Debug, Default)]
pub struct MemoryShardSource {
    files: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    local: bool,
    requests: Mutex<Vec<String>>,
}

impl MemoryShardSource {
    /// Create an empty remote-like source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file.
    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }

    /// Delay responses for one file.
    pub fn with_delay(mut self, name: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(name.into(), delay);
        self
    }

    /// Report the source as local, like a help site opened from disk.
    pub fn as_local(mut self) -> Self {
        self.local = true;
        self
    }

    /// File names requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ShardSource for MemoryShardSource {
    async fn fetch(&self, file_name: &str) -> Result<String, SearchError> {
        check_file_name(file_name)?;
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(file_name.to_string());
        }

        if let Some(delay) = self.delays.get(file_name) {
            tokio::time::sleep(*delay).await;
        }

        self.files
            .get(file_name)
            .cloned()
            .ok_or_else(|| SearchError::fetch(file_name, "not found"))
    }

    fn is_local(&self) -> bool {
        self.local
    }

    fn describe(&self) -> String {
        format!("memory ({} files)", self.files.len())
    }
}
