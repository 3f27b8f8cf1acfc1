//! Query execution.
//!
//! A query runs through a fixed sequence of steps: tokenize, read the prefix
//! index, route every token to its shard, read the shards one at a time while
//! intersecting the matching ids, then resolve the surviving ids to titles
//! and links. Each read races against the ticket's cancellation.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use helpnav_types::{SearchHit, SearchMessages, Settings};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::client::ClientProfile;
use crate::error::SearchError;
use crate::ids::resolve_ids;
use crate::prefixes::PrefixRouter;
use crate::query::tokenize;
use crate::session::{SearchPhase, SearchTicket};
use crate::shard::matching_ids;
use crate::source::{source_from_settings, ShardSource};

/// Name of the prefix index file.
pub const PREFIXES_FILE: &str = "prefixes.txt";

/// Name of the id lookup file.
pub const IDS_FILE: &str = "ids.txt";

/// Result of a completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    /// Query as typed
    pub query: String,

    /// Upper-cased words the query was split into
    pub tokens: Vec<String>,

    /// Matching topics in ascending id order
    pub hits: Vec<SearchHit>,
}

impl SearchOutcome {
    pub fn new(query: impl Into<String>, tokens: Vec<String>, hits: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            tokens,
            hits,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Text to show instead of a result list, if any.
    pub fn message<'a>(&self, messages: &'a SearchMessages) -> Option<&'a str> {
        self.is_empty().then_some(messages.not_found.as_str())
    }

    /// Words to highlight on result pages.
    pub fn highlight_terms(&self) -> &[String] {
        &self.tokens
    }
}

impl SearchError {
    /// Text to show for errors the user can act on.
    pub fn user_message<'a>(&self, messages: &'a SearchMessages) -> Option<&'a str> {
        match self {
            Self::EmptyQuery => Some(messages.empty_string.as_str()),
            Self::LocalSearchUnsupported => Some(messages.error_local_search.as_str()),
            _ => None,
        }
    }
}

/// Runs queries against one help site's search index.
pub struct SearchEngine {
    source: Arc<dyn ShardSource>,
    client: ClientProfile,
    support_link: String,
}

impl SearchEngine {
    pub fn new(source: Arc<dyn ShardSource>, support_link: impl Into<String>) -> Self {
        Self {
            source,
            client: ClientProfile::default(),
            support_link: support_link.into(),
        }
    }

    /// Build an engine for the configured site root.
    pub fn from_settings(settings: &Settings) -> Result<Self, SearchError> {
        let source = source_from_settings(settings)?;
        Ok(Self::new(source, settings.support_link.clone()))
    }

    /// Set the client the search runs on behalf of.
    pub fn with_client(mut self, client: ClientProfile) -> Self {
        self.client = client;
        self
    }

    pub fn client(&self) -> ClientProfile {
        self.client
    }

    pub fn source(&self) -> &Arc<dyn ShardSource> {
        &self.source
    }

    /// Run a standalone query that nothing can supersede.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, SearchError> {
        self.run(&SearchTicket::detached(), query).await
    }

    /// Run a query under `ticket`, reporting phases to its session.
    pub async fn run(
        &self,
        ticket: &SearchTicket,
        query: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let result = self.execute(ticket, query).await;
        match &result {
            Ok(outcome) if outcome.is_empty() => ticket.set_phase(SearchPhase::Empty),
            Ok(outcome) => ticket.set_phase(SearchPhase::Done {
                hits: outcome.hits.len(),
            }),
            Err(SearchError::Cancelled) => {
                debug!(query, generation = ticket.generation(), "Search cancelled");
            }
            Err(e) => {
                warn!(query, error = %e, "Search failed");
                ticket.set_phase(SearchPhase::Failed {
                    reason: e.to_string(),
                });
            }
        }
        result
    }

    async fn execute(
        &self,
        ticket: &SearchTicket,
        query: &str,
    ) -> Result<SearchOutcome, SearchError> {
        let tokens = tokenize(query)?;

        if self.source.is_local() && self.client.blocks_local_fetch() {
            return Err(SearchError::LocalSearchUnsupported);
        }

        info!(
            query,
            tokens = tokens.len(),
            source = %self.source.describe(),
            "Starting search"
        );

        ticket.set_phase(SearchPhase::FetchingPrefixIndex);
        let router = PrefixRouter::parse(&self.fetch(ticket, PREFIXES_FILE).await?);
        debug!(buckets = router.len(), "Loaded prefix index");

        let mut routes: Vec<(usize, String)> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            match router.route(token) {
                Some(bucket) => routes.push((i, bucket.file_name.clone())),
                None => {
                    debug!(token = %token, "No shard covers token");
                    return Ok(SearchOutcome::new(query, tokens, Vec::new()));
                }
            }
        }

        let total = routes.len();
        let mut shards: HashMap<String, String> = HashMap::new();
        let mut found: Option<BTreeSet<u32>> = None;

        for (index, (token_index, file)) in routes.iter().enumerate() {
            let token = &tokens[*token_index];
            ticket.set_phase(SearchPhase::FetchingTokenShard { index, total });
            if !shards.contains_key(file) {
                let text = self.fetch(ticket, file).await?;
                shards.insert(file.clone(), text);
            }
            let matches = matching_ids(&shards[file], token);

            ticket.set_phase(SearchPhase::Intersecting { index, total });
            let remaining = match found.take() {
                None => matches,
                Some(previous) => previous.intersection(&matches).copied().collect(),
            };
            debug!(token = %token, shard = %file, remaining = remaining.len(), "Applied token");

            if remaining.is_empty() {
                return Ok(SearchOutcome::new(query, tokens, Vec::new()));
            }
            found = Some(remaining);
        }

        let ids = found.unwrap_or_default();
        ticket.set_phase(SearchPhase::ResolvingIds { ids: ids.len() });
        let ids_file = self.fetch(ticket, IDS_FILE).await?;
        let hits = resolve_ids(&ids, &ids_file, &self.support_link);

        info!(query, hits = hits.len(), "Search finished");
        Ok(SearchOutcome::new(query, tokens, hits))
    }

    /// Read one index file unless the ticket is cancelled first.
    async fn fetch(&self, ticket: &SearchTicket, file: &str) -> Result<String, SearchError> {
        if ticket.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = ticket.cancelled() => Err(SearchError::Cancelled),
            result = self.source.fetch(file) => result,
        }
    }
}
