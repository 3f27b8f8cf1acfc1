//! Query-string helpers.

use percent_encoding::percent_decode_str;

/// Parse a form-encoded query string into decoded `(key, value)` pairs.
///
/// A leading `?` is ignored, `+` decodes to a space, pairs without a key
/// are dropped, and a key without `=` gets an empty value.
pub fn parse_query_string(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            if key.is_empty() {
                return None;
            }
            Some((decode_component(key), decode_component(value)))
        })
        .collect()
}

/// Look up a single decoded value; the last occurrence wins.
pub fn query_value(query: &str, key: &str) -> Option<String> {
    parse_query_string(query)
        .into_iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, value)| value)
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Append a `key=value` state pair to a link.
///
/// The pair goes before any `#anchor`. Anchor-only links stay relative to the
/// current page. Other query pairs of the link are kept, except earlier pairs
/// for the same key, which the new pair replaces.
pub fn next_page_url(href: &str, state_pair: &str) -> String {
    if state_pair.is_empty() {
        return href.to_string();
    }
    let key = state_pair
        .split_once('=')
        .map_or(state_pair, |(key, _)| key);

    let (base, anchor) = match href.find('#') {
        Some(pos) => href.split_at(pos),
        None => (href, ""),
    };
    let (path, query) = base.split_once('?').unwrap_or((base, ""));

    let mut pairs: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let existing = pair.split_once('=').map_or(*pair, |(k, _)| k);
            decode_component(existing) != key
        })
        .collect();
    pairs.push(state_pair);

    format!("{}?{}{}", path, pairs.join("&"), anchor)
}
