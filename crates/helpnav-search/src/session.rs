//! Search sessions.
//!
//! A session owns the "current search" slot of a search panel. Starting a
//! search cancels the previous one and bumps a generation counter; phase
//! updates and results from a superseded search are dropped, so a slow
//! earlier query can never overwrite a newer one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::engine::{SearchEngine, SearchOutcome};
use crate::error::SearchError;

/// Progress of the current search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    FetchingPrefixIndex,
    FetchingTokenShard { index: usize, total: usize },
    Intersecting { index: usize, total: usize },
    ResolvingIds { ids: usize },
    Done { hits: usize },
    Empty,
    Failed { reason: String },
}

impl SearchPhase {
    /// Whether the search has finished.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done { .. } | Self::Empty | Self::Failed { .. })
    }
}

/// The most recent result accepted by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedSearch {
    pub generation: u64,
    pub query: String,
    pub result: Result<SearchOutcome, SearchError>,
}

#[derive(Debug)]
struct SessionState {
    generation: u64,
    token: CancellationToken,
    latest: Option<PublishedSearch>,
}

#[derive(Debug)]
struct SessionInner {
    state: Mutex<SessionState>,
    phase_tx: watch::Sender<SearchPhase>,
}

impl SessionInner {
    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Handle held by one running search.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    token: CancellationToken,
    session: Option<Arc<SessionInner>>,
}

impl SearchTicket {
    /// A ticket outside any session: never superseded, phases discarded.
    pub fn detached() -> Self {
        Self {
            generation: 0,
            token: CancellationToken::new(),
            session: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once this search is superseded or cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }

    /// Cancel this search.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether this ticket still owns its session.
    pub fn is_current(&self) -> bool {
        if self.token.is_cancelled() {
            return false;
        }
        match &self.session {
            Some(session) => session.state().generation == self.generation,
            None => true,
        }
    }

    /// Report progress; ignored once the ticket is stale.
    pub fn set_phase(&self, phase: SearchPhase) {
        let Some(session) = &self.session else {
            return;
        };
        let state = session.state();
        if state.generation == self.generation && !self.token.is_cancelled() {
            session.phase_tx.send_replace(phase);
        }
    }
}

/// The current-search slot of one search panel.
#[derive(Debug, Clone)]
pub struct SearchSession {
    inner: Arc<SessionInner>,
}

impl SearchSession {
    pub fn new() -> Self {
        let (phase_tx, _) = watch::channel(SearchPhase::Idle);
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(SessionState {
                    generation: 0,
                    token: CancellationToken::new(),
                    latest: None,
                }),
                phase_tx,
            }),
        }
    }

    /// Start a new search, cancelling the one in flight.
    pub fn begin(&self) -> SearchTicket {
        let mut state = self.inner.state();
        state.token.cancel();
        state.generation += 1;
        state.token = CancellationToken::new();
        self.inner.phase_tx.send_replace(SearchPhase::Idle);
        debug!(generation = state.generation, "Began search");

        SearchTicket {
            generation: state.generation,
            token: state.token.clone(),
            session: Some(Arc::clone(&self.inner)),
        }
    }

    /// Cancel the search in flight, if any.
    pub fn cancel(&self) {
        self.inner.state().token.cancel();
    }

    pub fn generation(&self) -> u64 {
        self.inner.state().generation
    }

    /// Watch phase changes of the current search.
    pub fn subscribe(&self) -> watch::Receiver<SearchPhase> {
        self.inner.phase_tx.subscribe()
    }

    pub fn phase(&self) -> SearchPhase {
        self.inner.phase_tx.borrow().clone()
    }

    /// Store a finished result if `ticket` is still current.
    ///
    /// Returns false, leaving the session untouched, for stale tickets.
    pub fn publish(
        &self,
        ticket: &SearchTicket,
        query: &str,
        result: Result<SearchOutcome, SearchError>,
    ) -> bool {
        let mut state = self.inner.state();
        if state.generation != ticket.generation || ticket.is_cancelled() {
            debug!(
                ticket = ticket.generation,
                current = state.generation,
                query,
                "Discarding stale search result"
            );
            return false;
        }
        state.latest = Some(PublishedSearch {
            generation: ticket.generation,
            query: query.to_string(),
            result,
        });
        true
    }

    /// The last accepted result.
    pub fn latest(&self) -> Option<PublishedSearch> {
        self.inner.state().latest.clone()
    }

    /// Run `query` as the session's new current search.
    ///
    /// Returns None when a newer search superseded this one before it
    /// finished.
    pub async fn run(
        &self,
        engine: &SearchEngine,
        query: &str,
    ) -> Option<Result<SearchOutcome, SearchError>> {
        let ticket = self.begin();
        let result = engine.run(&ticket, query).await;
        if self.publish(&ticket, query, result.clone()) {
            Some(result)
        } else {
            None
        }
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new()
    }
}
