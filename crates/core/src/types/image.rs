//! Base64 image payload validation.
//!
//! Images are stored as base64 text inside the owning document, not in a
//! separate blob store. An empty string means "no image" and is always
//! accepted.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Errors that can occur when validating an image payload.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ImageError {
    /// The payload is not valid standard base64.
    #[error("invalid base64 image format")]
    InvalidBase64,
}

/// Validate that an image payload is well-formed standard base64.
///
/// Empty input is treated as valid (no image).
///
/// # Errors
///
/// Returns [`ImageError::InvalidBase64`] if the payload fails to decode.
pub fn validate_base64_image(image: &str) -> Result<(), ImageError> {
    if image.is_empty() {
        return Ok(());
    }

    STANDARD
        .decode(image)
        .map(|_| ())
        .map_err(|_| ImageError::InvalidBase64)
}
