//! Image Encoder — turns the selected file into a base64 payload.
//!
//! The payload is plain standard-alphabet base64 with no `data:` header,
//! paired with the file's media type. Read failures are returned to the
//! caller, never swallowed.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::debug;

use crate::error::{CoreError, EncodingError};
use crate::types::MediaType;

/// A file the user picked, with its declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    path: PathBuf,
    name: String,
    media_type: MediaType,
}

impl SelectedImage {
    /// Select a file, inferring the media type from its extension.
    ///
    /// # Errors
    /// Returns [`CoreError::UnsupportedMediaType`] if the extension is not
    /// jpg/jpeg/png/webp.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        let media_type = MediaType::from_path(&path)?;
        Ok(Self::with_media_type(path, media_type))
    }

    /// Select a file whose media type was declared by the picker.
    #[must_use]
    pub fn with_media_type(path: impl Into<PathBuf>, media_type: MediaType) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            path,
            name,
            media_type,
        }
    }

    /// Full path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name shown to the user.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared media type.
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// Base64 image payload ready to be sent as an inline image part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data: String,
    media_type: MediaType,
}

impl EncodedImage {
    /// Base64 payload, without any data-URI header.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Media type of the payload.
    #[must_use]
    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    ///
    /// # Errors
    /// Returns [`EncodingError::InvalidDataUrl`] if the header is missing or
    /// not base64, the media type is not accepted, or the payload does not
    /// decode.
    pub fn from_data_url(url: &str) -> Result<Self, EncodingError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| EncodingError::InvalidDataUrl("missing `data:` prefix".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| EncodingError::InvalidDataUrl("missing `,` separator".into()))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| EncodingError::InvalidDataUrl("payload is not base64".into()))?;
        let media_type = MediaType::from_mime(mime)
            .map_err(|e| EncodingError::InvalidDataUrl(e.to_string()))?;
        let payload = payload.trim();
        if payload.is_empty() {
            return Err(EncodingError::InvalidDataUrl("empty payload".into()));
        }
        BASE64
            .decode(payload)
            .map_err(|e| EncodingError::InvalidDataUrl(format!("bad base64: {e}")))?;
        Ok(Self {
            data: payload.to_string(),
            media_type,
        })
    }
}

/// Read the selected file and encode it.
///
/// # Errors
/// Returns [`EncodingError::Read`] if the file cannot be read and
/// [`EncodingError::Empty`] if it has no content.
pub fn encode_image(image: &SelectedImage) -> Result<EncodedImage, EncodingError> {
    let bytes = std::fs::read(image.path()).map_err(|source| EncodingError::Read {
        path: image.path().to_path_buf(),
        source,
    })?;
    if bytes.is_empty() {
        return Err(EncodingError::Empty(image.path().to_path_buf()));
    }
    debug!(
        file = %image.name(),
        media_type = %image.media_type(),
        bytes = bytes.len(),
        "Encoded selected image"
    );
    Ok(encode_bytes(&bytes, image.media_type()))
}

/// Encode in-memory image bytes.
#[must_use]
pub fn encode_bytes(bytes: &[u8], media_type: MediaType) -> EncodedImage {
    EncodedImage {
        data: BASE64.encode(bytes),
        media_type,
    }
}

/// Drop a leading `data:...,` header, if present.
#[must_use]
pub fn strip_data_uri_header(text: &str) -> &str {
    if text.starts_with("data:") {
        text.split_once(',').map_or("", |(_, payload)| payload)
    } else {
        text
    }
}
