//! Deterministic local suggester.
//!
//! Wraps the core classifier behind the `SymbolSuggester` trait so the
//! authoring flow works offline and tests stay deterministic.

use std::time::Instant;

use async_trait::async_trait;

use mathquiz_core::classifier::classify;
use mathquiz_core::suggest::{SuggestRequest, SuggestResponse, SymbolSuggester};

/// Suggester backed by the deterministic token scan. Never fails.
pub struct LocalSuggester;

#[async_trait]
impl SymbolSuggester for LocalSuggester {
    fn name(&self) -> &str {
        "local"
    }

    async fn suggest(&self, request: &SuggestRequest) -> anyhow::Result<SuggestResponse> {
        let start = Instant::now();
        let symbols = classify(&request.text, &request.catalog);

        Ok(SuggestResponse {
            content: format!("[{}]", symbols.join(", ")),
            symbols,
            model: "local-scan".to_string(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathquiz_core::catalog::SymbolCatalog;

    #[tokio::test]
    async fn scans_the_question_text() {
        let request = SuggestRequest {
            text: "Prove \\neg (A \\land B) for x \\in A".into(),
            catalog: SymbolCatalog::builtin(),
        };
        let response = LocalSuggester.suggest(&request).await.unwrap();
        assert_eq!(response.symbols, vec!["\\neg", "\\in", "\\land"]);
        assert_eq!(response.model, "local-scan");
    }

    #[tokio::test]
    async fn empty_text_yields_no_suggestions() {
        let request = SuggestRequest {
            text: String::new(),
            catalog: SymbolCatalog::builtin(),
        };
        let response = LocalSuggester.suggest(&request).await.unwrap();
        assert!(response.symbols.is_empty());
    }
}
