//! Image validation for recipe pictures and user avatars.
//!
//! Clients send images inline as `data:image/<type>;base64,<payload>` strings.
//! The declared type is not trusted: the format is detected from magic bytes.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, ImageReader};

/// Allowed image formats for recipe pictures and avatars.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum decoded image size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub data: Vec<u8>,
    /// Detected content type (e.g., "image/png").
    pub content_type: String,
}

/// Validate image data: check format is allowed and detect content type.
///
/// Returns the content type on success (e.g., "image/jpeg").
pub fn validate_image(data: &[u8]) -> Result<String, String> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("Failed to read image: {}", e))?;

    let format = reader
        .format()
        .ok_or_else(|| "Could not detect image format".to_string())?;

    if !ALLOWED_FORMATS.contains(&format) {
        return Err(format!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        ));
    }

    Ok(format.to_mime_type().to_string())
}

/// Decode a base64 data URL into validated image bytes.
pub fn decode_data_url(value: &str) -> Result<DecodedImage, String> {
    let rest = value
        .strip_prefix("data:image")
        .ok_or_else(|| "Expected a data:image/...;base64 string".to_string())?;

    let (_, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| "Image must be base64 encoded".to_string())?;

    // Rough pre-check so we never allocate far past the limit
    if payload.len() / 4 * 3 > MAX_FILE_SIZE + 3 {
        return Err("Image too large. Maximum size is 10MB".to_string());
    }

    let data = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| format!("Invalid base64 data: {}", e))?;

    if data.is_empty() {
        return Err("Image is empty".to_string());
    }
    if data.len() > MAX_FILE_SIZE {
        return Err("Image too large. Maximum size is 10MB".to_string());
    }

    let content_type = validate_image(&data)?;

    Ok(DecodedImage { data, content_type })
}
