use image::{ColorType, DynamicImage, ImageFormat};

/// Normalized output is only produced for these formats
pub const ALLOWED_FORMATS: [SourceFormat; 5] = [
    SourceFormat::Jpeg,
    SourceFormat::Png,
    SourceFormat::Gif,
    SourceFormat::Bmp,
    SourceFormat::WebP,
];

/// Upper-case format name to content type. Lookups are case-insensitive.
const CONTENT_TYPES: [(&str, &str); 6] = [
    ("JPEG", "image/jpeg"),
    ("JPG", "image/jpeg"),
    ("PNG", "image/png"),
    ("GIF", "image/gif"),
    ("BMP", "image/bmp"),
    ("WEBP", "image/webp"),
];

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Content type for a format name; unknown or empty names map to JPEG
pub fn content_type_for(format_name: &str) -> &'static str {
    let upper = format_name.to_ascii_uppercase();
    CONTENT_TYPES
        .iter()
        .find(|(name, _)| *name == upper)
        .map(|(_, content_type)| *content_type)
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    #[default]
    Jpeg,
    Png,
    Gif,
    Bmp,
    WebP,
}

impl SourceFormat {
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(SourceFormat::Jpeg),
            ImageFormat::Png => Some(SourceFormat::Png),
            ImageFormat::Gif => Some(SourceFormat::Gif),
            ImageFormat::Bmp => Some(SourceFormat::Bmp),
            ImageFormat::WebP => Some(SourceFormat::WebP),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "JPEG",
            SourceFormat::Png => "PNG",
            SourceFormat::Gif => "GIF",
            SourceFormat::Bmp => "BMP",
            SourceFormat::WebP => "WEBP",
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            SourceFormat::Jpeg => ImageFormat::Jpeg,
            SourceFormat::Png => ImageFormat::Png,
            SourceFormat::Gif => ImageFormat::Gif,
            SourceFormat::Bmp => ImageFormat::Bmp,
            SourceFormat::WebP => ImageFormat::WebP,
        }
    }

    pub fn content_type(&self) -> &'static str {
        content_type_for(self.name())
    }

    pub fn is_allowed(&self) -> bool {
        ALLOWED_FORMATS.contains(self)
    }
}

/// Human-readable name for formats outside the allowed set
pub(crate) fn image_format_name(format: ImageFormat) -> String {
    format
        .extensions_str()
        .first()
        .map(|ext| ext.to_ascii_uppercase())
        .unwrap_or_else(|| format!("{:?}", format).to_ascii_uppercase())
}

/// Pixel layout of a decoded raster
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
    L,
    La,
    Other,
}

impl ColorMode {
    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            ColorType::L8 | ColorType::L16 => ColorMode::L,
            ColorType::La8 | ColorType::La16 => ColorMode::La,
            _ => ColorMode::Other,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, ColorMode::Rgba | ColorMode::La)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::Other => "OTHER",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Decoded image together with the format it was stored in
#[derive(Debug, Clone)]
pub struct ImageAsset {
    pub format: SourceFormat,
    pub image: DynamicImage,
}

impl ImageAsset {
    pub fn new(format: SourceFormat, image: DynamicImage) -> Self {
        Self { format, image }
    }

    pub fn color_mode(&self) -> ColorMode {
        ColorMode::from_color_type(self.image.color())
    }

    /// 8-bit RGB without alpha, the only layout the encoders accept
    pub fn is_normalized(&self) -> bool {
        self.image.color() == ColorType::Rgb8
    }

    pub fn dimensions(&self) -> ImageSize {
        ImageSize::new(self.image.width(), self.image.height())
    }
}

/// Where a processed object came from and how large both sides are
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub original_container: String,
    pub original_key: String,
    pub original_byte_size: u64,
    pub processed_byte_size: u64,
}

impl Provenance {
    /// Store-level metadata attached to the processed object
    pub fn to_metadata(&self) -> std::collections::HashMap<String, String> {
        [
            ("original-bucket", self.original_container.clone()),
            ("original-key", self.original_key.clone()),
            ("original-size", self.original_byte_size.to_string()),
            ("processed-size", self.processed_byte_size.to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedAsset {
    pub encoded_bytes: Vec<u8>,
    pub content_type: &'static str,
    pub provenance: Provenance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_lookup() {
        assert_eq!(content_type_for("JPEG"), "image/jpeg");
        assert_eq!(content_type_for("JPG"), "image/jpeg");
        assert_eq!(content_type_for("PNG"), "image/png");
        assert_eq!(content_type_for("GIF"), "image/gif");
        assert_eq!(content_type_for("BMP"), "image/bmp");
        assert_eq!(content_type_for("WEBP"), "image/webp");
        assert_eq!(content_type_for("UNKNOWN"), "image/jpeg");
        assert_eq!(content_type_for(""), "image/jpeg");
    }

    #[test]
    fn test_content_type_lookup_is_case_insensitive() {
        assert_eq!(content_type_for("jpeg"), "image/jpeg");
        assert_eq!(content_type_for("Png"), "image/png");
        assert_eq!(content_type_for("webp"), "image/webp");
    }

    #[test]
    fn test_format_names_round_trip_through_lookup() {
        for format in ALLOWED_FORMATS {
            assert_eq!(
                SourceFormat::from_image_format(format.image_format()),
                Some(format)
            );
            assert!(format.is_allowed());
        }
        assert_eq!(SourceFormat::Gif.content_type(), "image/gif");
        assert_eq!(SourceFormat::default(), SourceFormat::Jpeg);
    }

    #[test]
    fn test_unsupported_image_formats_rejected() {
        assert_eq!(SourceFormat::from_image_format(ImageFormat::Tiff), None);
        assert_eq!(image_format_name(ImageFormat::Tiff), "TIFF");
        assert_eq!(
            SourceFormat::from_image_format(ImageFormat::WebP),
            Some(SourceFormat::WebP)
        );
    }

    #[test]
    fn test_provenance_metadata_keys() {
        let provenance = Provenance {
            original_container: "uploads".to_string(),
            original_key: "cat.png".to_string(),
            original_byte_size: 1024,
            processed_byte_size: 512,
        };
        let metadata = provenance.to_metadata();
        assert_eq!(metadata.len(), 4);
        assert_eq!(metadata["original-bucket"], "uploads");
        assert_eq!(metadata["original-key"], "cat.png");
        assert_eq!(metadata["original-size"], "1024");
        assert_eq!(metadata["processed-size"], "512");
    }
}
