//! The declutter instruction and the response schema.
//!
//! The schema uses Gemini's OpenAPI subset: upper-case type names and a
//! `propertyOrdering` list so `area` is generated before `suggestionText`.

use serde_json::{Value, json};

/// Fixed instruction sent alongside the image.
pub const DECLUTTER_PROMPT: &str = r"
You are an expert home organizer and decluttering consultant named 'Revamp'.
Analyze the provided image of a room. Identify specific areas or items that are cluttered or could be better organized.
For each area, provide a concrete, actionable suggestion for how to improve it.
Focus on practical advice that the user can implement easily.
Respond ONLY with a JSON array of objects. Do not include any other text, greetings, or explanations.
";

/// Sampling temperature for suggestion requests.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Response format requested from the model.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Field names, in generation order.
pub const SUGGESTION_FIELDS: [&str; 2] = ["area", "suggestionText"];

/// Schema constraining the model output to an array of suggestions.
#[must_use]
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "area": {
                    "type": "STRING",
                    "description": "The specific area or item in the room that needs attention (e.g., 'Coffee Table', 'Bookshelf', 'Desk Corner')."
                },
                "suggestionText": {
                    "type": "STRING",
                    "description": "A clear, actionable decluttering or organization suggestion for this area."
                }
            },
            "required": SUGGESTION_FIELDS,
            "propertyOrdering": SUGGESTION_FIELDS
        }
    })
}
