// src/menu_sync/utils/image.rs
// Re-encoding of picked images into the gallery format: lossy WebP,
// dimensions unchanged.

use image::DynamicImage;
use std::ops::Deref;
use thiserror::Error;
use webp::Encoder;

pub const WEBP_MIME_TYPE: &str = "image/webp";

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("image is {size} bytes, over the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("failed to encode image as WebP: {0}")]
    Encode(String),
}

/// Decodes `raw` to a raster and encodes it as WebP at `quality` (0-100).
pub fn encode_webp(raw: &[u8], quality: f32, max_bytes: usize) -> Result<Vec<u8>, ConvertError> {
    if raw.len() > max_bytes {
        return Err(ConvertError::TooLarge {
            size: raw.len(),
            limit: max_bytes,
        });
    }

    let decoded = image::load_from_memory(raw)?;
    // The WebP encoder only takes 8-bit RGB or RGBA
    let raster = if decoded.color().has_alpha() {
        DynamicImage::ImageRgba8(decoded.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(decoded.to_rgb8())
    };

    let encoder = Encoder::from_image(&raster).map_err(|e| ConvertError::Encode(e.to_string()))?;
    Ok(encoder.encode(quality).deref().to_owned())
}
