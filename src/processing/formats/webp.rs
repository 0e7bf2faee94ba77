use image::DynamicImage;
use tracing::error;

use crate::PipelineError;

/// Lossy WebP encode via libwebp
pub fn encode(image: &DynamicImage, quality: f32) -> Result<Vec<u8>, PipelineError> {
    let rgb_image = image.to_rgb8();
    let (width, height) = rgb_image.dimensions();

    let encoder = ::webp::Encoder::from_rgb(rgb_image.as_raw(), width, height);
    match encoder.encode_simple(false, quality) {
        Ok(encoded) => Ok(encoded.to_vec()),
        Err(e) => {
            error!("WebP encoding failed: {:?}", e);
            Err(PipelineError::Encode(format!("WebP encoding failed: {:?}", e)))
        }
    }
}
