//! Core value types: suggestions and accepted media types.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Suggestion
// ---------------------------------------------------------------------------

/// One decluttering suggestion: the area it applies to and what to do.
///
/// Both fields are trimmed and guaranteed non-empty. Deserialization goes
/// through the same check as [`Suggestion::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSuggestion", into = "RawSuggestion")]
pub struct Suggestion {
    area: String,
    suggestion_text: String,
}

/// Reason a suggestion was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    /// `area` was empty or whitespace.
    #[error("suggestion area is empty")]
    EmptyArea,
    /// `suggestionText` was empty or whitespace.
    #[error("suggestion text is empty")]
    EmptyText,
}

impl Suggestion {
    /// Build a validated suggestion.
    ///
    /// # Errors
    /// Returns [`SuggestionError`] if either field is blank after trimming.
    pub fn new(
        area: impl AsRef<str>,
        suggestion_text: impl AsRef<str>,
    ) -> Result<Self, SuggestionError> {
        let area = area.as_ref().trim();
        let suggestion_text = suggestion_text.as_ref().trim();
        if area.is_empty() {
            return Err(SuggestionError::EmptyArea);
        }
        if suggestion_text.is_empty() {
            return Err(SuggestionError::EmptyText);
        }
        Ok(Self {
            area: area.to_string(),
            suggestion_text: suggestion_text.to_string(),
        })
    }

    /// Short label for the area, e.g. "Desk".
    #[must_use]
    pub fn area(&self) -> &str {
        &self.area
    }

    /// The actionable advice for this area.
    #[must_use]
    pub fn suggestion_text(&self) -> &str {
        &self.suggestion_text
    }
}

/// Wire shape of a suggestion, before validation.
#[derive(Serialize, Deserialize)]
struct RawSuggestion {
    area: String,
    #[serde(rename = "suggestionText")]
    suggestion_text: String,
}

impl TryFrom<RawSuggestion> for Suggestion {
    type Error = SuggestionError;

    fn try_from(raw: RawSuggestion) -> Result<Self, Self::Error> {
        Suggestion::new(raw.area, raw.suggestion_text)
    }
}

impl From<Suggestion> for RawSuggestion {
    fn from(s: Suggestion) -> Self {
        Self {
            area: s.area,
            suggestion_text: s.suggestion_text,
        }
    }
}

// ---------------------------------------------------------------------------
// Media types
// ---------------------------------------------------------------------------

/// The image types the upload surface accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    /// `image/jpeg`
    #[serde(rename = "image/jpeg")]
    Jpeg,
    /// `image/png`
    #[serde(rename = "image/png")]
    Png,
    /// `image/webp`
    #[serde(rename = "image/webp")]
    Webp,
}

impl MediaType {
    /// All accepted media types.
    pub const ALL: [MediaType; 3] = [Self::Jpeg, Self::Png, Self::Webp];

    /// MIME string sent to the model.
    #[must_use]
    pub fn as_mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Webp => "image/webp",
        }
    }

    /// Parse a MIME type. Case-insensitive; `image/jpg` is accepted as JPEG.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedMediaType`] for anything else.
    pub fn from_mime(mime: &str) -> Result<Self, CoreError> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            "image/webp" => Ok(Self::Webp),
            _ => Err(CoreError::UnsupportedMediaType(mime.to_string())),
        }
    }

    /// Map a file extension (without the dot) to a media type.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Infer the media type from a path's extension.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedMediaType`] when the extension is
    /// missing or not an accepted image type.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| CoreError::UnsupportedMediaType(path.display().to_string()))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_mime())
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s)
    }
}
