//! # helpnav-state
//!
//! Carries the help viewer's UI state (selected tab, pane scroll and width,
//! last search, open tree nodes) from page to page in a single query
//! parameter.
//!
//! The state is written in a small versioned binary layout (see [`schema`])
//! and then base64-encoded with the URL-safe alphabet, so the value never
//! needs percent-escaping.

pub mod encoder;
pub mod error;
pub mod schema;
pub mod url;
mod varint;

pub use encoder::{StateEncoder, StateProducer};
pub use error::StateError;
pub use schema::{StateField, StateValue, UiState, STATE_VERSION};
pub use url::{next_page_url, parse_query_string, query_value};
