//! Search index routing and result types.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Routes a lexicographic token range to the shard file holding its entries.
///
/// Buckets come from `prefixes.txt` and are sorted and non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixBucket {
    /// Shard file name, including the `.txt` extension
    pub file_name: String,

    /// First word stored in the shard
    pub first_token: String,

    /// Last word stored in the shard
    pub last_token: String,
}

impl PrefixBucket {
    pub fn new(
        file_name: impl Into<String>,
        first_token: impl Into<String>,
        last_token: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            first_token: first_token.into(),
            last_token: last_token.into(),
        }
    }

    /// Whether `token` is routed to this bucket.
    ///
    /// A token below the first entry is covered only when it is a prefix of
    /// it (`SKIN` against `SKINNER`); a token past the last entry is covered
    /// only when the last entry is a prefix of it (`SKINNER` against `SKIN`).
    pub fn covers(&self, token: &str) -> bool {
        match token.cmp(self.first_token.as_str()) {
            Ordering::Less => self.first_token.starts_with(token),
            Ordering::Equal => true,
            Ordering::Greater => {
                token <= self.last_token.as_str() || token.starts_with(self.last_token.as_str())
            }
        }
    }
}

/// A resolved search result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    pub title: String,

    /// Page link
    pub link: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }

    /// Placeholder hit used when the id lookup file is inconsistent.
    pub fn lookup_error(support_link: impl Into<String>) -> Self {
        Self::new("Error!", support_link)
    }

    /// Whether this is the placeholder produced by [`SearchHit::lookup_error`].
    pub fn is_lookup_error(&self) -> bool {
        self.title == "Error!"
    }
}
