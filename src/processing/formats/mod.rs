pub mod jpeg;
pub mod png;
pub mod webp;

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use super::types::SourceFormat;
use crate::PipelineError;

/// Quality factor for the lossy encoders
pub const QUALITY: u8 = 85;

/// Serialize an RGB raster in `format`
pub fn encode(image: &DynamicImage, format: SourceFormat) -> Result<Vec<u8>, PipelineError> {
    match format {
        SourceFormat::Jpeg => jpeg::encode(image, QUALITY),
        SourceFormat::Png => png::encode(image),
        SourceFormat::WebP => self::webp::encode(image, QUALITY as f32),
        SourceFormat::Gif | SourceFormat::Bmp => encode_generic(image, format.image_format()),
    }
}

/// Formats with no tuning knobs go through the image crate's default encoder
fn encode_generic(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, PipelineError> {
    let mut output = Cursor::new(Vec::new());
    image.write_to(&mut output, format)?;
    Ok(output.into_inner())
}
