//! Shard file parsing.
//!
//! A shard is a `;`-separated list of `word;ids` pairs where `ids` is a
//! comma-separated list of topic ids.

use std::collections::BTreeSet;

use tracing::warn;

/// Collect the ids of every word in the shard that starts with `token`.
///
/// `token` is expected upper-cased; shard words are compared upper-cased.
pub fn matching_ids(shard: &str, token: &str) -> BTreeSet<u32> {
    let fields: Vec<&str> = shard.split(';').map(str::trim).collect();
    let mut ids = BTreeSet::new();

    for pair in fields.chunks_exact(2) {
        let (word, id_list) = (pair[0], pair[1]);
        if word.is_empty() || !word.to_uppercase().starts_with(token) {
            continue;
        }
        for raw in id_list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<u32>() {
                Ok(id) => {
                    ids.insert(id);
                }
                Err(_) => warn!(word, id = raw, "Skipping malformed id in shard"),
            }
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_word() {
        let ids = matching_ids("CAT;1,2;DOG;2,3", "CAT");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_prefix_union() {
        let ids = matching_ids("INSTALL;4,1;INSTALLER;7;INSTANCE;9", "INSTALL");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 4, 7]);
    }

    #[test]
    fn test_case_and_whitespace() {
        let ids = matching_ids(" cat ; 1, 2 ;\n dog;3", "CAT");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let ids = matching_ids("CAT;1,x,,3;CATS", "CAT");
        assert_eq!(ids.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_no_match() {
        assert!(matching_ids("CAT;1;DOG;2", "COW").is_empty());
        assert!(matching_ids("", "COW").is_empty());
    }
}
