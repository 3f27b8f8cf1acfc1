//! Assembling the UI state from registered producers.

use std::fmt;

use helpnav_types::Settings;
use tracing::{debug, warn};

use crate::schema::{StateField, StateValue, UiState};
use crate::url::{next_page_url, query_value};

/// Produces the current value of one state field, or None to leave it out.
pub type StateProducer = Box<dyn Fn() -> Option<StateValue> + Send + Sync>;

/// Collects state from the viewer's components and encodes it into one
/// query parameter.
pub struct StateEncoder {
    param: String,
    producers: Vec<(StateField, StateProducer)>,
}

impl fmt::Debug for StateEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateEncoder")
            .field("param", &self.param)
            .field(
                "producers",
                &self.producers.iter().map(|(field, _)| *field).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl StateEncoder {
    /// Create an encoder writing to the `param` query key.
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
            producers: Vec::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.state_param.clone())
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Register the producer for `field`, replacing any earlier one.
    pub fn add_producer<F>(&mut self, field: StateField, producer: F)
    where
        F: Fn() -> Option<StateValue> + Send + Sync + 'static,
    {
        self.producers.retain(|(existing, _)| *existing != field);
        self.producers.push((field, Box::new(producer)));
    }

    /// Ask every producer for its current value.
    ///
    /// Empty text values are left out; values of the wrong kind are logged
    /// and skipped.
    pub fn collect(&self) -> UiState {
        let mut state = UiState::default();
        for (field, producer) in &self.producers {
            let Some(value) = producer() else {
                continue;
            };
            if matches!(&value, StateValue::Text(text) if text.is_empty()) {
                continue;
            }
            if let Err(e) = state.set(*field, value) {
                warn!(field = field.key(), error = %e, "Ignoring state value");
            }
        }
        state
    }

    /// Encode the collected state.
    pub fn encode(&self) -> String {
        self.collect().encode()
    }

    /// `param=encoded` for the collected state.
    pub fn query_pair(&self) -> String {
        format!("{}={}", self.param, self.encode())
    }

    /// Link to `href` carrying the collected state.
    pub fn next_page_url(&self, href: &str) -> String {
        next_page_url(href, &self.query_pair())
    }

    /// Read the state from a page's query string.
    ///
    /// A missing or undecodable parameter yields None; a damaged link must
    /// never stop the page from loading.
    pub fn decode_from_query(&self, query: &str) -> Option<UiState> {
        let encoded = query_value(query, &self.param)?;
        match UiState::decode(&encoded) {
            Ok(state) => {
                debug!(param = %self.param, "Restored UI state");
                Some(state)
            }
            Err(e) => {
                warn!(param = %self.param, error = %e, "Discarding undecodable UI state");
                None
            }
        }
    }
}
