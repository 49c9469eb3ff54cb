//! Gemini API suggester implementation.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use mathquiz_core::classifier::sanitize;
use mathquiz_core::error::SuggestError;
use mathquiz_core::suggest::{extract_json_array, SuggestRequest, SuggestResponse, SymbolSuggester};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini API suggester.
pub struct GeminiSuggester {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiSuggester {
    pub fn new(api_key: &str, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

/// Instructs the model to act as an extractor: only tokens from the
/// valid list, only as a JSON array of strings.
fn build_prompt(catalog_list: &str, text: &str) -> String {
    format!(
        "Analyze the following LaTeX text and extract all unique mathematical symbols \
         that are present in the provided valid symbol list.\n\n\
         RULES:\n\
         1. Only return symbols that are present in the \"VALID SYMBOL LIST\".\n\
         2. Return your answer *only* as a valid JSON array of strings.\n\
         3. Do not include any other text, explanations, or markdown (like ```json).\n\
         4. If no valid symbols are found, return an empty array [].\n\n\
         --- VALID SYMBOL LIST ---\n\
         {catalog_list}\n\
         --- END OF LIST ---\n\n\
         --- EXAMPLE ---\n\
         User Input: \"Prove that $\\neg (A \\land B) \\equiv (\\neg A) \\vee (\\neg B)$ for all $A, B$.\"\n\
         Your Response:\n\
         [\"\\\\neg\", \"\\\\land\", \"\\\\equiv\", \"\\\\vee\", \"\\\\forall\"]\n\
         --- END OF EXAMPLE ---\n\n\
         --- USER INPUT ---\n\
         {text}\n\
         --- END OF USER INPUT ---\n\n\
         Your Response:\n"
    )
}

#[derive(Serialize)]
struct GeminiApiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    // Forces the model to answer with JSON.
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
    temperature: f64,
}

#[derive(Deserialize)]
struct GeminiApiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Deserialize)]
struct GeminiApiErrorBody {
    message: String,
}

#[async_trait]
impl SymbolSuggester for GeminiSuggester {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn suggest(&self, request: &SuggestRequest) -> anyhow::Result<SuggestResponse> {
        let start = Instant::now();

        let prompt = build_prompt(&request.catalog.joined_list(), &request.text);
        let body = GeminiApiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                // Deterministic extraction, not creative writing.
                temperature: 0.0,
            },
        };

        // The API authenticates via a key query parameter, not a header.
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let response = self
            .client
            .post(url)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SuggestError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    SuggestError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                * 1000;
            return Err(SuggestError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(SuggestError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(SuggestError::ModelNotFound(self.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(SuggestError::ApiError { status, message }.into());
        }

        let api_response: GeminiApiResponse =
            response.json().await.map_err(|e| SuggestError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        // The model's answer is itself a JSON string buried in the first
        // candidate's parts.
        let payload = api_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| {
                SuggestError::MalformedResponse("no candidates in response".to_string())
            })?;

        let raw_symbols = extract_json_array(&payload).ok_or_else(|| {
            SuggestError::MalformedResponse(format!(
                "no JSON array of strings in payload: {payload}"
            ))
        })?;

        // The external source is untrusted; keep only known tokens.
        let symbols = sanitize(raw_symbols, &request.catalog);

        Ok(SuggestResponse {
            content: payload,
            symbols,
            model: self.model.clone(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
