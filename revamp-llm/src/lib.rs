//! # revamp-llm — Suggestion Service Client
//!
//! Turns a room photo into decluttering suggestions using the hosted
//! Gemini `generateContent` API.
//!
//! Every call:
//!   - sends exactly one inline image part followed by one text part
//!     (the fixed declutter instruction)
//!   - asks for `application/json` constrained by a two-field schema
//!   - uses a low temperature (0.3) for consistent output
//!   - validates the reply into `Vec<Suggestion>`, or fails with a typed
//!     [`LlmError`]; a JSON object is never coerced into a one-item list
//!
//! There are no retries. A failed call is re-run only when the user asks.

pub mod client;
pub mod error;
pub mod prompt;
pub mod types;

pub use client::{SuggestionClient, SuggestionService, parse_suggestions};
pub use error::LlmError;
pub use types::{GenerateContentRequest, GenerateContentResponse};
