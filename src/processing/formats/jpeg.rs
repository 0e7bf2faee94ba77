use image::DynamicImage;
use jpeg_encoder::{ColorType, Encoder};

use crate::PipelineError;

/// Encode as progressive JPEG with optimized Huffman tables
pub fn encode(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, PipelineError> {
    // JPEG doesn't support alpha channel, so convert to RGB
    let rgb_image = image.to_rgb8();
    let (width, height) = rgb_image.dimensions();

    let (width, height) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(PipelineError::Encode(format!(
                "{}x{} exceeds the JPEG dimension limit",
                width, height
            )));
        }
    };

    let mut output = Vec::new();
    let mut encoder = Encoder::new(&mut output, quality);
    encoder.set_progressive(true);
    encoder.set_optimized_huffman_tables(true);
    encoder.encode(rgb_image.as_raw(), width, height, ColorType::Rgb)?;

    Ok(output)
}
