//! Image references.
//!
//! An image is referenced either by an `http(s)` URL or inline as a base64
//! `data:` URL (what an admin upload produces). Both are stored as plain
//! strings in the remote store and the local cache.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Largest upload accepted for inline encoding.
///
/// Inline images live inside cached documents, so they count against the
/// local storage quota.
pub const MAX_INLINE_BYTES: usize = 2 * 1024 * 1024;

/// Errors for image references.
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("invalid image url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("unsupported url scheme: {0}")]
    UnsupportedScheme(String),
    #[error("malformed data url")]
    MalformedDataUrl,
    #[error("not an image content type: {0}")]
    NotAnImage(String),
    #[error("image too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },
}

/// A reference to an image, either a URL or an inline data URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    /// Wrap a stored reference without validation.
    ///
    /// Stored documents are trusted as-is; use [`ImageRef::parse`] for input.
    #[must_use]
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Parse and validate a user-supplied reference.
    ///
    /// Accepts the empty string, `http`/`https` URLs and base64 image data URLs.
    ///
    /// # Errors
    ///
    /// Returns an `ImageError` describing why the reference is unusable.
    pub fn parse(reference: &str) -> Result<Self, ImageError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Ok(Self::default());
        }

        if reference.starts_with("data:") {
            split_data_url(reference)?;
            return Ok(Self(reference.to_owned()));
        }

        let url = Url::parse(reference)?;
        match url.scheme() {
            "http" | "https" => Ok(Self(reference.to_owned())),
            other => Err(ImageError::UnsupportedScheme(other.to_owned())),
        }
    }

    /// Encode raw image bytes as an inline data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type is not `image/*` or the payload
    /// exceeds [`MAX_INLINE_BYTES`].
    pub fn inline(content_type: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        if !content_type.starts_with("image/") {
            return Err(ImageError::NotAnImage(content_type.to_owned()));
        }
        if bytes.len() > MAX_INLINE_BYTES {
            return Err(ImageError::TooLarge {
                size: bytes.len(),
                max: MAX_INLINE_BYTES,
            });
        }

        Ok(Self(format!(
            "data:{content_type};base64,{}",
            STANDARD.encode(bytes)
        )))
    }

    /// Whether no image is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the stored reference string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split `data:<type>;base64,<payload>` into its type and payload.
fn split_data_url(reference: &str) -> Result<(&str, &str), ImageError> {
    let rest = reference
        .strip_prefix("data:")
        .ok_or(ImageError::MalformedDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(ImageError::MalformedDataUrl)?;
    let content_type = meta
        .strip_suffix(";base64")
        .ok_or(ImageError::MalformedDataUrl)?;

    if !content_type.starts_with("image/") {
        return Err(ImageError::NotAnImage(content_type.to_owned()));
    }

    Ok((content_type, payload))
}
