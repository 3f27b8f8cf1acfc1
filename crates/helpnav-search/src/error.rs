//! Search error types.

use thiserror::Error;

/// Errors that end a search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The query contained no words
    #[error("Query is empty")]
    EmptyQuery,

    /// The client cannot read index files from a local site
    #[error("Search in local files is not supported by this client")]
    LocalSearchUnsupported,

    /// An index file could not be read
    #[error("Failed to fetch {file}: {reason}")]
    Fetch { file: String, reason: String },

    /// A file name from the index would escape the search directory
    #[error("Invalid index file name: {0}")]
    InvalidFileName(String),

    /// The source could not be set up
    #[error("Invalid source configuration: {0}")]
    Config(String),

    /// A newer search superseded this one
    #[error("Search was cancelled")]
    Cancelled,
}

impl SearchError {
    pub(crate) fn fetch(file: &str, reason: impl ToString) -> Self {
        Self::Fetch {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}
