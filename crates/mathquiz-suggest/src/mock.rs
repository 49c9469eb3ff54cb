//! Mock suggester for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use mathquiz_core::suggest::{SuggestRequest, SuggestResponse, SymbolSuggester};

/// A mock suggester for testing the authoring flow without real API
/// calls. Returns configurable symbol lists based on text matching.
pub struct MockSuggester {
    /// Map of text substring → suggested symbols.
    responses: HashMap<String, Vec<String>>,
    /// Default symbols if no text matches.
    default_symbols: Vec<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<SuggestRequest>>,
}

impl MockSuggester {
    /// Create a mock with the given text→symbols mappings.
    pub fn new(responses: HashMap<String, Vec<String>>) -> Self {
        Self {
            responses,
            default_symbols: Vec::new(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always suggests the same symbols.
    pub fn with_fixed_symbols(symbols: Vec<&str>) -> Self {
        Self {
            responses: HashMap::new(),
            default_symbols: symbols.into_iter().map(String::from).collect(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this suggester.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this suggester.
    pub fn last_request(&self) -> Option<SuggestRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl SymbolSuggester for MockSuggester {
    fn name(&self) -> &str {
        "mock"
    }

    async fn suggest(&self, request: &SuggestRequest) -> anyhow::Result<SuggestResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let symbols = self
            .responses
            .iter()
            .find(|(key, _)| request.text.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .unwrap_or_else(|| self.default_symbols.clone());

        Ok(SuggestResponse {
            content: serde_json::to_string(&symbols).unwrap_or_default(),
            symbols,
            model: "mock".to_string(),
            latency_ms: 1,
        })
    }
}
