//! Color normalization.
//!
//! Every asset leaves here as 8-bit RGB. Anything carrying an alpha channel
//! is composited over an opaque white canvas using its own alpha as the
//! mask. Palette images never reach this point as such: the decoders expand
//! them to RGB, or to RGBA when the palette has transparent entries, so the
//! alpha rule covers them too.

use image::{DynamicImage, Rgb, RgbImage, Rgba};

use super::types::ImageAsset;

const BACKGROUND: [u8; 3] = [255, 255, 255];

pub fn normalize(asset: ImageAsset) -> ImageAsset {
    let ImageAsset { format, image } = asset;

    let image = if asset_has_alpha(&image) {
        DynamicImage::ImageRgb8(flatten_alpha(&image, BACKGROUND))
    } else if image.color() != image::ColorType::Rgb8 {
        DynamicImage::ImageRgb8(image.to_rgb8())
    } else {
        image
    };

    ImageAsset::new(format, image)
}

fn asset_has_alpha(image: &DynamicImage) -> bool {
    image.color().has_alpha()
}

/// Alpha-composite `image` over a solid `background`
fn flatten_alpha(image: &DynamicImage, background: [u8; 3]) -> RgbImage {
    let rgba = image.to_rgba8();
    let mut canvas = RgbImage::from_pixel(rgba.width(), rgba.height(), Rgb(background));

    for (dst, src) in canvas.pixels_mut().zip(rgba.pixels()) {
        let Rgba([r, g, b, a]) = *src;
        *dst = Rgb([
            blend(r, background[0], a),
            blend(g, background[1], a),
            blend(b, background[2], a),
        ]);
    }

    canvas
}

fn blend(foreground: u8, background: u8, alpha: u8) -> u8 {
    let alpha = alpha as u32;
    let value = foreground as u32 * alpha + background as u32 * (255 - alpha);
    ((value + 127) / 255) as u8
}
