//! Service client error types.

use thiserror::Error;

/// Errors that can occur while fetching suggestions.
///
/// Every variant ends up as the same user-facing message; the detail is
/// for logs.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The request never got a response (DNS, connect, TLS, reset).
    #[error("Suggestion request failed: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("Suggestion request timed out after {0}ms")]
    Timeout(u64),

    /// The service answered with a non-success status.
    #[error("Suggestion service returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The service answered but produced no usable text (no candidates,
    /// blocked prompt, empty output).
    #[error("Suggestion service returned no content: {0}")]
    EmptyResponse(String),

    /// Response was not valid JSON.
    #[error("Failed to parse suggestion response as JSON: {0}")]
    ParseError(String),

    /// Response JSON did not match the expected schema.
    #[error("Suggestion response schema validation failed: {0}")]
    SchemaValidation(String),

    /// Configuration error.
    #[error("Suggestion client configuration error: {0}")]
    Config(String),
}

/// Timeouts are not mapped here: the client knows the configured limit and
/// builds [`LlmError::Timeout`] itself.
impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            LlmError::ParseError(err.to_string())
        } else {
            LlmError::Transport(err.to_string())
        }
    }
}
