use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

pub const DEFAULT_MAX_IMAGE_MB: usize = 10;

/// Reasons an uploaded image is rejected before any OCR call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No image data provided")]
    EmptyInput,
    #[error("Invalid image format. Expected base64 encoded image.")]
    InvalidFormat,
    #[error("Image size exceeds maximum allowed size of {max_mb}MB")]
    TooLarge { max_mb: usize },
}

fn data_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^data:image/(png|jpeg|jpg|gif|webp);base64,").expect("valid data url pattern")
    })
}

/// Validate a data-URL encoded image.
///
/// The size is estimated as `len * 3 / 4` over the whole string, prefix
/// included, so it slightly overstates the decoded payload.
pub fn validate_image(image_data: &str, max_mb: usize) -> Result<(), ValidationError> {
    if image_data.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    if !data_url_pattern().is_match(image_data) {
        return Err(ValidationError::InvalidFormat);
    }

    let estimated_bytes = image_data.len() as f64 * 3.0 / 4.0;
    let max_bytes = (max_mb * 1024 * 1024) as f64;
    if estimated_bytes > max_bytes {
        return Err(ValidationError::TooLarge { max_mb });
    }

    Ok(())
}
