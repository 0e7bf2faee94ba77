use image::imageops::FilterType;
use tracing::debug;

use super::formats;
use super::types::{ImageAsset, ImageSize};
use crate::PipelineError;

/// Resample to exactly `target` and encode in the asset's own format.
///
/// Aspect ratio is not preserved.
pub fn resize_and_encode(asset: &ImageAsset, target: ImageSize) -> Result<Vec<u8>, PipelineError> {
    if !asset.is_normalized() {
        return Err(PipelineError::Encode(format!(
            "expected RGB input, got {}",
            asset.color_mode().name()
        )));
    }

    let resized = asset
        .image
        .resize_exact(target.width, target.height, FilterType::Lanczos3);

    let encoded = formats::encode(&resized, asset.format)?;
    debug!(
        "Encoded {} at {}: {} bytes",
        asset.format.name(),
        target,
        encoded.len()
    );
    Ok(encoded)
}
