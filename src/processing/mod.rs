// Image processing module - validation, color normalization, resizing and encoding
mod classify;
pub mod formats;
mod item;
mod normalize;
mod resize;
mod types;

pub use classify::classify;
pub use item::{ItemProcessor, PROCESSED_PREFIX, ProcessedItem, processed_key, transform};
pub use normalize::normalize;
pub use resize::resize_and_encode;
pub use types::*;
