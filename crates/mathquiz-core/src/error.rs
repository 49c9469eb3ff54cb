//! Suggestion-source error types.
//!
//! These represent failures when talking to an external symbol
//! suggester. Defined in `mathquiz-core` so the autofill engine can
//! downcast and classify errors for retry decisions without string
//! matching.

use thiserror::Error;

/// Errors that can occur when interacting with a symbol suggester.
#[derive(Debug, Error)]
pub enum SuggestError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response arrived but was not in the expected shape (missing
    /// candidates, or no parseable JSON array of strings in the payload).
    #[error("malformed suggestion response: {0}")]
    MalformedResponse(String),
}

impl SuggestError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SuggestError::AuthenticationFailed(_) | SuggestError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            SuggestError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence() {
        assert!(SuggestError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(SuggestError::ModelNotFound("gemini-x".into()).is_permanent());
        assert!(!SuggestError::NetworkError("reset".into()).is_permanent());
        assert!(!SuggestError::MalformedResponse("prose".into()).is_permanent());
    }

    #[test]
    fn retry_after_hint() {
        let err = SuggestError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.retry_after_ms(), Some(5000));
        assert_eq!(SuggestError::Timeout(60).retry_after_ms(), None);
    }
}
