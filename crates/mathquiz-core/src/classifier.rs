//! Deterministic symbol classifier.
//!
//! Decides which catalog tokens are present in a block of question text.
//! Used as the no-network fallback for the hosted suggester and as the
//! sanitization filter applied to any external suggestion source.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::SymbolCatalog;
use crate::model::dedup_preserving_order;

lazy_static! {
    /// A command-style token: backslash followed by letters.
    static ref COMMAND_TOKEN: Regex = Regex::new(r"\\[a-zA-Z]+").unwrap();
}

/// Classify `text` against `catalog`, returning the present tokens in
/// catalog order, deduplicated. Idempotent: classifying its own output
/// (joined back into text) yields the same set.
pub fn classify(text: &str, catalog: &SymbolCatalog) -> Vec<String> {
    // Maximal \command runs in the text. "\sin" yields "\sin", never the
    // embedded "\in", so exact equality against the catalog is safe.
    let commands: std::collections::HashSet<&str> = COMMAND_TOKEN
        .find_iter(text)
        .filter(|m| !text[..m.start()].ends_with('\\'))
        .map(|m| m.as_str())
        .collect();

    catalog
        .iter()
        .filter(|token| commands.contains(token) || has_token(text, token))
        .map(str::to_string)
        .collect()
}

/// Boundary-aware containment test. An occurrence counts only when it is
/// not preceded by a stray escaping backslash and, for tokens ending in a
/// letter, not followed by a word character (so `\in` never matches
/// inside `\int`, and `table` never matches inside `tables`).
fn has_token(text: &str, token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let needs_right_boundary = token.ends_with(|c: char| c.is_ascii_alphabetic());

    let mut start = 0;
    while let Some(pos) = text[start..].find(token) {
        let at = start + pos;
        let preceded_by_escape = text[..at].ends_with('\\');
        let followed_by_word = needs_right_boundary
            && matches!(
                text[at + token.len()..].chars().next(),
                Some(c) if c.is_ascii_alphanumeric() || c == '_'
            );

        if !preceded_by_escape && !followed_by_word {
            return true;
        }
        start = at + 1;
    }
    false
}

/// Intersect an untrusted suggestion list with the catalog, preserving
/// first-seen order and dropping duplicates. External sources must never
/// inject tokens outside the known catalog.
pub fn sanitize(suggestions: Vec<String>, catalog: &SymbolCatalog) -> Vec<String> {
    dedup_preserving_order(
        suggestions
            .into_iter()
            .filter(|s| catalog.contains(s))
            .collect(),
    )
}
