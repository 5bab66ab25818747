//! Shared test utilities for the herbario test suite.
//!
//! Synthetic image writers and an asset-root fixture laid out the way the
//! application expects it on disk:
//!
//! ```text
//! <root>/
//! ├── fundo.png                # background candidate
//! └── imagens_plantas/
//!     ├── tribulus.png
//!     └── maca.jpg
//! ```

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

/// Write a small valid JPEG with a gradient pattern.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a PNG filled with a single RGBA color.
pub fn write_solid_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    let img = RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Temp asset root with `imagens_plantas/` holding a PNG for `tribulus`,
/// a JPEG for `maca`, and a `fundo.png` background.
pub fn setup_asset_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let images = tmp.path().join("imagens_plantas");
    std::fs::create_dir_all(&images).unwrap();
    write_solid_png(&images.join("tribulus.png"), 8, 12, [30, 90, 40, 255]);
    write_test_jpeg(&images.join("maca.jpg"), 16, 16);
    write_solid_png(&tmp.path().join("fundo.png"), 4, 4, [200, 200, 180, 255]);
    tmp
}
