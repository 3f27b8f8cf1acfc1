//! Query tokenization.

use crate::error::SearchError;

/// Split a query into upper-cased words.
///
/// Repeated words are dropped since intersecting a set with itself changes
/// nothing. Fails with [`SearchError::EmptyQuery`] when no word remains.
pub fn tokenize(query: &str) -> Result<Vec<String>, SearchError> {
    let mut tokens: Vec<String> = Vec::new();
    for word in query.split_whitespace() {
        let token = word.to_uppercase();
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    if tokens.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    Ok(tokens)
}
