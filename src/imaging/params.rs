//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which decides what to produce, and the
//! [`backend`](super::backend), which does the pixel work.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Parameters for a shrink-and-reencode operation.
///
/// `width`/`height` are the exact output dimensions; when they equal the
/// source dimensions the pixels are re-encoded without resampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ShrinkParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
