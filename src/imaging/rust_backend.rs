//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Identify | `image::image_dimensions` |
//! | Brighten | per-channel multiply over `RgbaImage`, encoded as PNG |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::scale_channel;
use super::params::ShrinkParams;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk, sniffing the format from content.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Encode and save as baseline RGB JPEG.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality as u8);
    DynamicImage::ImageRgb8(img.to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn brighten(&self, path: &Path, factor: f32) -> Result<Vec<u8>, BackendError> {
        let mut rgba = load_image(path)?.to_rgba8();
        for pixel in rgba.pixels_mut() {
            for channel in pixel.0.iter_mut().take(3) {
                *channel = scale_channel(*channel, factor);
            }
        }

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))?;
        Ok(bytes)
    }

    fn shrink(&self, params: &ShrinkParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let resized = if img.width() == params.width && img.height() == params.height {
            img
        } else {
            img.resize_exact(params.width, params.height, FilterType::Lanczos3)
        };
        save_jpeg(&resized, &params.output, params.quality.value())
    }
}
