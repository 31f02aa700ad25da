//! Photo transcoding.
//!
//! Photos are decoded, scaled down so their long edge fits the configured
//! bound (never up), re-encoded as JPEG at quality 85 and stored inline as a
//! `data:` URI. Nothing reaches the persisted state unless every step worked.

use crate::error::{DiaryError, Result};
use crate::model::EncodedImage;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use std::path::Path;

pub const JPEG_QUALITY: u8 = 85;

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Target raster size for a `width`×`height` image whose long edge must not
/// exceed `max_edge_px`. The ratio is preserved; nothing is ever enlarged.
pub fn scaled_dimensions(width: u32, height: u32, max_edge_px: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge == 0 {
        return (width, height);
    }
    let ratio = (max_edge_px as f64 / long_edge as f64).min(1.0);
    let scale = |edge: u32| ((edge as f64 * ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Decode `bytes`, bound the long edge to `max_edge_px` and re-encode as a
/// JPEG data URI.
pub fn transcode(bytes: &[u8], max_edge_px: u32) -> Result<EncodedImage> {
    if max_edge_px == 0 {
        return Err(DiaryError::ImageDecodeFailed(
            "maximum edge must be at least one pixel".to_string(),
        ));
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| DiaryError::ImageDecodeFailed(e.to_string()))?;
    let (width, height) = scaled_dimensions(img.width(), img.height(), max_edge_px);

    // JPEG has no alpha channel; flatten to RGB before scaling.
    let rgb = img.to_rgb8();
    let scaled = if (width, height) == rgb.dimensions() {
        rgb
    } else {
        image::imageops::resize(&rgb, width, height, FilterType::Triangle)
    };

    let mut jpeg_bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg_bytes, JPEG_QUALITY)
        .encode(&scaled, width, height, image::ColorType::Rgb8.into())
        .map_err(|e| DiaryError::ImageDecodeFailed(e.to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD.encode(&jpeg_bytes);
    Ok(EncodedImage::new(format!("{}{}", DATA_URI_PREFIX, encoded)))
}

/// Read a photo from disk and transcode it off the async executor.
pub async fn transcode_file(path: &Path, max_edge_px: u32) -> Result<EncodedImage> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        DiaryError::ImageDecodeFailed(format!("{}: {}", path.display(), e))
    })?;
    tokio::task::spawn_blocking(move || transcode(&bytes, max_edge_px))
        .await
        .map_err(|e| DiaryError::ImageDecodeFailed(e.to_string()))?
}
