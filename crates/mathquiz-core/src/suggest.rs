//! The suggestion boundary.
//!
//! `SymbolSuggester` is the seam between the authoring flow and any
//! source of symbol suggestions: the hosted LLM, the deterministic
//! classifier, or a test mock. Implementations live in the
//! `mathquiz-suggest` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::catalog::SymbolCatalog;
use crate::classifier::sanitize;

/// Trait for backends that suggest catalog tokens for a question text.
#[async_trait]
pub trait SymbolSuggester: Send + Sync {
    /// Human-readable suggester name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Suggest symbols for a question.
    async fn suggest(&self, request: &SuggestRequest) -> anyhow::Result<SuggestResponse>;
}

/// Request to suggest symbols for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestRequest {
    /// The question text, typically LaTeX.
    pub text: String,
    /// The catalog the suggester must draw from.
    pub catalog: SymbolCatalog,
}

/// Response from a symbol suggestion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// The raw response payload, before extraction.
    pub content: String,
    /// Extracted tokens, already intersected with the catalog and
    /// deduplicated.
    pub symbols: Vec<String>,
    /// Backend that produced the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Suggest symbols without ever failing.
///
/// Any suggester error is logged and resolved to an empty list; callers
/// treat that as "no suggestions available", not "zero symbols are
/// relevant". The returned tokens are re-sanitized against the catalog
/// whatever the suggester claims.
pub async fn suggest_symbols(
    suggester: &dyn SymbolSuggester,
    catalog: &SymbolCatalog,
    text: &str,
) -> Vec<String> {
    let request = SuggestRequest {
        text: text.to_string(),
        catalog: catalog.clone(),
    };

    match suggester.suggest(&request).await {
        Ok(response) => sanitize(response.symbols, catalog),
        Err(e) => {
            tracing::warn!(
                suggester = suggester.name(),
                "suggestion failed, continuing without: {e:#}"
            );
            Vec::new()
        }
    }
}

/// Extract a JSON array of strings from an LLM response payload.
///
/// Handles:
/// - A bare JSON array
/// - An array wrapped in prose or markdown fences (the first `[...]`
///   span is taken, matching the original extraction behavior)
/// - Bare backslashes that break strict JSON string escaping (escaped
///   and reparsed on failure)
///
/// Returns `None` when no parseable array is found.
pub fn extract_json_array(payload: &str) -> Option<Vec<String>> {
    let start = payload.find('[')?;
    let end = start + payload[start..].find(']')?;
    let span = &payload[start..=end];

    match serde_json::from_str::<Vec<String>>(span) {
        Ok(values) => Some(values),
        Err(_) => serde_json::from_str(&escape_bare_backslashes(span)).ok(),
    }
}

/// Double every backslash that does not already start a recognized JSON
/// escape sequence, so LaTeX commands like `\qed` survive parsing.
fn escape_bare_backslashes(span: &str) -> String {
    let mut out = String::with_capacity(span.len());
    let mut chars = span.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.peek() {
                Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' | 'u') => out.push('\\'),
                _ => out.push_str("\\\\"),
            }
        } else {
            out.push(c);
        }
    }
    out
}
