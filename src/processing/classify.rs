use image::ImageReader;
use std::io::Cursor;
use tracing::debug;

use super::types::{ImageAsset, SourceFormat, image_format_name};
use crate::{MAX_IMAGE_SIZE, PipelineError};

/// Validate and decode a fetched object.
///
/// The declared size is checked before anything is decoded and the format
/// is detected from the header, so unsupported or oversized payloads are
/// rejected without allocating a pixel buffer.
pub fn classify(raw_bytes: &[u8], declared_size: u64) -> Result<ImageAsset, PipelineError> {
    if declared_size > MAX_IMAGE_SIZE {
        return Err(PipelineError::SizeLimitExceeded {
            size: declared_size,
            limit: MAX_IMAGE_SIZE,
        });
    }

    let reader = ImageReader::new(Cursor::new(raw_bytes))
        .with_guessed_format()
        .map_err(|e| PipelineError::Encode(e.to_string()))?;

    let detected = reader
        .format()
        .ok_or_else(|| PipelineError::UnsupportedFormat("unrecognized".to_string()))?;

    let format = SourceFormat::from_image_format(detected)
        .filter(SourceFormat::is_allowed)
        .ok_or_else(|| PipelineError::UnsupportedFormat(image_format_name(detected)))?;

    debug!("Detected {} image, {} bytes", format.name(), raw_bytes.len());

    let image = reader.decode()?;
    Ok(ImageAsset::new(format, image))
}
