//! Topic id resolution through `ids.txt`.
//!
//! The file holds three lines per topic; topic `n` (1-based) has its title on
//! line `(n - 1) * 3 + 1` and its link on the line after.

use std::collections::BTreeSet;

use helpnav_types::SearchHit;
use tracing::warn;

/// Map ids to hits in ascending id order.
///
/// A missing title falls back to the link. A missing link means the file
/// does not match the shards, and the whole result collapses into a single
/// placeholder hit pointing at `support_link`.
pub fn resolve_ids(ids: &BTreeSet<u32>, ids_file: &str, support_link: &str) -> Vec<SearchHit> {
    let lines: Vec<&str> = ids_file.split('\n').map(str::trim).collect();
    let line = |n: usize| lines.get(n).copied().filter(|s| !s.is_empty());

    let mut hits = Vec::with_capacity(ids.len());
    for &id in ids {
        let title_line = usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|n| n.checked_mul(3))
            .and_then(|base| base.checked_add(1));
        let (title, link) = match title_line {
            Some(n) => (line(n), n.checked_add(1).and_then(line)),
            None => (None, None),
        };

        match (title, link) {
            (Some(title), Some(link)) => hits.push(SearchHit::new(title, link)),
            (None, Some(link)) => hits.push(SearchHit::new(link, link)),
            (_, None) => {
                warn!(id, lines = lines.len(), "Search id has no entry in ids.txt");
                return vec![SearchHit::lookup_error(support_link)];
            }
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDS: &str = "\nCats\ncats.htm\n\nDogs\ndogs.htm\n\n\nbirds.htm\n";

    fn ids(values: &[u32]) -> BTreeSet<u32> {
        values.iter().copied().collect()
    }

    #[test]
    fn test_resolve_in_id_order() {
        let hits = resolve_ids(&ids(&[2, 1]), IDS, "mailto:help@example.com");
        assert_eq!(
            hits,
            vec![
                SearchHit::new("Cats", "cats.htm"),
                SearchHit::new("Dogs", "dogs.htm"),
            ]
        );
    }

    #[test]
    fn test_missing_title_uses_link() {
        let hits = resolve_ids(&ids(&[3]), IDS, "mailto:help@example.com");
        assert_eq!(hits, vec![SearchHit::new("birds.htm", "birds.htm")]);
    }

    #[test]
    fn test_missing_link_is_lookup_error() {
        let hits = resolve_ids(&ids(&[1, 9]), IDS, "mailto:help@example.com");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].is_lookup_error());
        assert_eq!(hits[0].link, "mailto:help@example.com");
    }

    #[test]
    fn test_zero_id_is_lookup_error() {
        let hits = resolve_ids(&ids(&[0]), IDS, "mailto:help@example.com");
        assert!(hits[0].is_lookup_error());
    }

    #[test]
    fn test_largest_id_is_lookup_error() {
        let hits = resolve_ids(&ids(&[1, u32::MAX]), IDS, "mailto:help@example.com");
        assert_eq!(hits, vec![SearchHit::lookup_error("mailto:help@example.com")]);
    }

    #[test]
    fn test_crlf_lines() {
        let hits = resolve_ids(&ids(&[1]), "\r\nCats\r\ncats.htm\r\n", "x");
        assert_eq!(hits, vec![SearchHit::new("Cats", "cats.htm")]);
    }
}
