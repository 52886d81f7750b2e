//! Suggestion client — one `generateContent` call per analysis.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use revamp_core::config::ServiceConfig;
use revamp_core::{EncodedImage, Suggestion};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LlmError;
use crate::prompt::{DECLUTTER_PROMPT, RESPONSE_MIME_TYPE, response_schema};
use crate::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, InlineData, Part,
};

/// Longest slice of a raw body or response text quoted in an error.
const MAX_QUOTED_CHARS: usize = 300;

/// Anything that can turn an encoded room photo into suggestions.
///
/// Implemented by [`SuggestionClient`]; tests and the app driver use the
/// trait so the hosted model can be swapped for a fake.
#[async_trait]
pub trait SuggestionService: Send + Sync {
    /// Fetch suggestions for `image`, in model order.
    async fn get_declutter_suggestions(
        &self,
        image: &EncodedImage,
    ) -> Result<Vec<Suggestion>, LlmError>;
}

/// Client for the hosted Gemini model.
pub struct SuggestionClient {
    http: Client,
    config: ServiceConfig,
}

impl SuggestionClient {
    /// Create a client from validated service settings.
    ///
    /// # Errors
    /// Returns [`LlmError::Config`] if the settings are invalid (e.g. no
    /// API key) or the HTTP client cannot be built.
    pub fn new(config: ServiceConfig) -> Result<Self, LlmError> {
        let http = Client::builder()
            .build()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Self::with_http(config, http)
    }

    /// Create a client around an existing `reqwest::Client`.
    ///
    /// # Errors
    /// Returns [`LlmError::Config`] if the settings are invalid.
    pub fn with_http(config: ServiceConfig, http: Client) -> Result<Self, LlmError> {
        config
            .validate()
            .map_err(|e| LlmError::Config(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Model in use.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Full URL of the `generateContent` endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Shape the request: one image part, then the instruction, plus the
    /// JSON schema and temperature.
    #[must_use]
    pub fn build_request(&self, image: &EncodedImage) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".into()),
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.media_type().as_mime().to_string(),
                            data: image.data().to_string(),
                        },
                    },
                    Part::Text {
                        text: DECLUTTER_PROMPT.to_string(),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE.to_string(),
                response_schema: response_schema(),
                temperature: self.config.temperature,
            },
        }
    }

    /// Call the model and validate its answer.
    ///
    /// # Errors
    /// Transport failures, timeouts, non-success statuses, empty or blocked
    /// responses, malformed JSON and schema violations each map to their
    /// own [`LlmError`] variant.
    pub async fn suggest(&self, image: &EncodedImage) -> Result<Vec<Suggestion>, LlmError> {
        let url = self.endpoint();
        let body = self.build_request(image);
        let timeout_ms = self.config.request_timeout_ms;
        debug!(
            model = %self.config.model,
            media_type = %image.media_type(),
            payload_len = image.data().len(),
            temperature = self.config.temperature,
            "Requesting declutter suggestions"
        );

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .timeout(Duration::from_millis(timeout_ms))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!("Suggestion request timed out after {}ms", timeout_ms);
                    LlmError::Timeout(timeout_ms)
                } else {
                    warn!("Suggestion request failed: {}", e);
                    LlmError::from(e)
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!("Suggestion service returned error: HTTP {}", status);
            return Err(LlmError::Http {
                status: status.as_u16(),
                body: quote(&text),
            });
        }

        let raw = resp.text().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(timeout_ms)
            } else {
                LlmError::from(e)
            }
        })?;
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let envelope: GenerateContentResponse = serde_json::from_str(&raw).map_err(|e| {
            LlmError::ParseError(format!("response envelope: {e} — raw body: '{}'", quote(&raw)))
        })?;

        if let Some(reason) = envelope.block_reason() {
            return Err(LlmError::EmptyResponse(format!("prompt blocked ({reason})")));
        }
        let Some(text) = envelope.text() else {
            let reason = envelope.finish_reason().unwrap_or("no candidates");
            return Err(LlmError::EmptyResponse(format!("no text in response ({reason})")));
        };

        let suggestions = parse_suggestions(&text)?;
        debug!(latency_ms, count = suggestions.len(), "Received declutter suggestions");
        Ok(suggestions)
    }
}

#[async_trait]
impl SuggestionService for SuggestionClient {
    async fn get_declutter_suggestions(
        &self,
        image: &EncodedImage,
    ) -> Result<Vec<Suggestion>, LlmError> {
        self.suggest(image).await
    }
}

/// Validate the model's text into suggestions.
///
/// The top level must be a JSON array; every element must be an object
/// with non-empty string `area` and `suggestionText`. Extra fields are
/// ignored. Order is preserved.
///
/// # Errors
/// [`LlmError::ParseError`] for invalid JSON, [`LlmError::SchemaValidation`]
/// for valid JSON of the wrong shape.
pub fn parse_suggestions(text: &str) -> Result<Vec<Suggestion>, LlmError> {
    let value: Value = serde_json::from_str(text.trim()).map_err(|e| {
        LlmError::ParseError(format!("JSON parse error: {e} — raw text: '{}'", quote(text)))
    })?;

    let Value::Array(items) = value else {
        return Err(LlmError::SchemaValidation(format!(
            "expected a JSON array of suggestions, got {}",
            json_kind(&value)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            if !item.is_object() {
                return Err(LlmError::SchemaValidation(format!(
                    "item {index} is {}, expected an object",
                    json_kind(&item)
                )));
            }
            serde_json::from_value::<Suggestion>(item)
                .map_err(|e| LlmError::SchemaValidation(format!("item {index}: {e}")))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn quote(text: &str) -> String {
    let mut quoted: String = text.chars().take(MAX_QUOTED_CHARS).collect();
    if text.chars().count() > MAX_QUOTED_CHARS {
        quoted.push('…');
    }
    quoted
}
