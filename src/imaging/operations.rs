//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take
//! configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_within;
use super::params::{Quality, ShrinkParams};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Configuration for asset shrinking.
#[derive(Debug, Clone)]
pub struct ShrinkConfig {
    /// Bounding box `(width, height)` the output must fit inside.
    pub max: (u32, u32),
    pub quality: Quality,
}

impl Default for ShrinkConfig {
    fn default() -> Self {
        Self {
            max: (800, 1200),
            quality: Quality::default(),
        }
    }
}

/// Plan a shrink without executing it. The output is always `<stem>.jpg`
/// in `output_dir`.
pub fn plan_shrink(
    source: &Path,
    output_dir: &Path,
    stem: &str,
    original_dims: (u32, u32),
    config: &ShrinkConfig,
) -> ShrinkParams {
    let (width, height) = fit_within(original_dims, config.max);
    ShrinkParams {
        source: source.to_path_buf(),
        output: output_dir.join(format!("{stem}.jpg")),
        width,
        height,
        quality: config.quality,
    }
}

/// What a shrink did, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkResult {
    pub original: (u32, u32),
    pub params: ShrinkParams,
}

/// Shrink an image to fit the configured box and re-encode it as JPEG.
pub fn shrink_to_jpeg(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    stem: &str,
    config: &ShrinkConfig,
) -> Result<ShrinkResult> {
    let original = get_dimensions(backend, source)?;
    let params = plan_shrink(source, output_dir, stem, original, config);
    backend.shrink(&params)?;
    Ok(ShrinkResult { original, params })
}

/// Brighten an image and return PNG bytes.
pub fn brightened_png(backend: &dyn ImageBackend, source: &Path, factor: f32) -> Result<Vec<u8>> {
    backend.brighten(source, factor)
}
