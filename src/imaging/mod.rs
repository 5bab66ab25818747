//! Image processing in pure Rust, on the `image` crate.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Brighten** | per-channel multiply, PNG re-encode |
//! | **Shrink → JPEG** | Lanczos3 + `JpegEncoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension and pixel math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::fit_within;
pub use operations::{
    ShrinkConfig, ShrinkResult, brightened_png, get_dimensions, plan_shrink, shrink_to_jpeg,
};
pub use params::{Quality, ShrinkParams};
pub use rust_backend::RustBackend;
