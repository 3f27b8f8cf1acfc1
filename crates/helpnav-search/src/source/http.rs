//! HTTP source for help sites served from a web server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::{debug, warn};

use super::{check_file_name, ShardSource};
use crate::error::SearchError;

/// Fetches index files relative to a base URL.
///
/// Each request is bounded by the configured timeout and never retried; a
/// failed request ends the search.
#[derive(Debug, Clone)]
pub struct HttpShardSource {
    client: Client,
    base: Url,
}

impl HttpShardSource {
    /// Create a source for the search directory at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let mut base = Url::parse(base_url).map_err(|e| SearchError::Config(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }
}

#[async_trait]
impl ShardSource for HttpShardSource {
    async fn fetch(&self, file_name: &str) -> Result<String, SearchError> {
        check_file_name(file_name)?;
        let url = self
            .base
            .join(file_name)
            .map_err(|e| SearchError::fetch(file_name, e))?;

        debug!(%url, "Requesting index file");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| SearchError::fetch(file_name, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "Index request failed");
            return Err(SearchError::fetch(file_name, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| SearchError::fetch(file_name, e))
    }

    fn is_local(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}
