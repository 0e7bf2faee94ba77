use image::DynamicImage;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};

use crate::PipelineError;

/// Encode as PNG with maximum compression
pub fn encode(image: &DynamicImage) -> Result<Vec<u8>, PipelineError> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut output, CompressionType::Best, FilterType::Adaptive);
    image.write_with_encoder(encoder)?;
    Ok(output)
}
