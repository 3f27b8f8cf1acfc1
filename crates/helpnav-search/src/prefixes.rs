//! Prefix index parsing and token routing.
//!
//! `prefixes.txt` is a `;`-separated list of `name;first;last` triples, one
//! per shard, sorted by first word. A token is routed to the shard whose word
//! range it falls in, allowing for prefix matches at either end of a range.

use helpnav_types::PrefixBucket;
use tracing::warn;

/// Parse the contents of `prefixes.txt`.
///
/// Words are upper-cased to match tokenized queries. An incomplete trailing
/// triple is ignored.
pub fn parse_prefixes(text: &str) -> Vec<PrefixBucket> {
    let fields: Vec<&str> = text.split(';').map(str::trim).collect();
    fields
        .chunks_exact(3)
        .filter(|triple| !triple[0].is_empty())
        .map(|triple| {
            PrefixBucket::new(
                format!("{}.txt", triple[0]),
                triple[1].to_uppercase(),
                triple[2].to_uppercase(),
            )
        })
        .collect()
}

/// Sorted prefix buckets with token lookup.
#[derive(Debug, Clone, Default)]
pub struct PrefixRouter {
    buckets: Vec<PrefixBucket>,
}

impl PrefixRouter {
    /// Wrap parsed buckets, sorting them by first word if needed.
    pub fn new(mut buckets: Vec<PrefixBucket>) -> Self {
        let sorted = buckets
            .windows(2)
            .all(|pair| pair[0].first_token <= pair[1].first_token);
        if !sorted {
            warn!(buckets = buckets.len(), "Prefix index is not sorted, sorting");
            buckets.sort_by(|a, b| a.first_token.cmp(&b.first_token));
        }
        Self { buckets }
    }

    /// Parse `prefixes.txt` into a router.
    pub fn parse(text: &str) -> Self {
        Self::new(parse_prefixes(text))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn buckets(&self) -> &[PrefixBucket] {
        &self.buckets
    }

    /// Find the bucket holding `token`.
    ///
    /// Candidates are the buckets whose first word starts with the token's
    /// first character; the first one covering the token wins.
    pub fn route(&self, token: &str) -> Option<&PrefixBucket> {
        let lead = token.chars().next()?;
        let lead_of = |bucket: &PrefixBucket| bucket.first_token.chars().next();

        let start = self
            .buckets
            .partition_point(|bucket| lead_of(bucket).map_or(true, |c| c < lead));

        self.buckets[start..]
            .iter()
            .take_while(|bucket| lead_of(bucket) == Some(lead))
            .find(|bucket| bucket.covers(token))
    }
}
