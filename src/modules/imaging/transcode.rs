//! Decode, bound, and re-encode uploaded images.
//!
//! Pure byte-to-byte transform with no I/O, so it can run on the blocking
//! pool and be tested without a filesystem.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use thiserror::Error;

/// Extension of every artifact produced by [`transcode`]
pub const ARTIFACT_EXTENSION: &str = "jpg";

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image payload is empty")]
    Empty,

    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    #[error("failed to encode image: {0}")]
    Encode(image::ImageError),

    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),

    #[error("image worker failed: {0}")]
    Worker(String),
}

/// Bounds applied to every artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeSettings {
    pub max_dimension: u32,
    pub jpeg_quality: u8,
}

/// Encoded artifact plus the geometry before and after resizing
#[derive(Debug, Clone)]
pub struct Transcoded {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

/// Dimensions that fit inside a `max` x `max` box, keeping the aspect ratio.
/// Images already inside the box are returned unchanged (no upscaling).
pub fn fit_inside(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }

    let scale = f64::from(max) / f64::from(width.max(height));
    let scaled = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max);

    (scaled(width), scaled(height))
}

/// Decode `bytes` in any supported format, shrink it to fit the bounding box
/// and re-encode as JPEG.
pub fn transcode(bytes: &[u8], settings: TranscodeSettings) -> Result<Transcoded, ImageError> {
    if bytes.is_empty() {
        return Err(ImageError::Empty);
    }

    let source = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    let (source_width, source_height) = source.dimensions();

    let (width, height) = fit_inside(source_width, source_height, settings.max_dimension);
    let resized = if (width, height) == (source_width, source_height) {
        source
    } else {
        source.resize_exact(width, height, FilterType::Lanczos3)
    };

    let bytes = encode_jpeg(&resized, settings.jpeg_quality)?;

    Ok(Transcoded {
        bytes,
        width,
        height,
        source_width,
        source_height,
    })
}

fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    // JPEG has no alpha channel
    let rgb = image.to_rgb8();

    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(ImageError::Encode)?;

    Ok(buf.into_inner())
}
