//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the application
//! needs: identify, brighten (for the page background) and shrink (for the
//! asset optimizer). The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::ShrinkParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, multiply every color channel by `factor`, and return PNG bytes.
    fn brighten(&self, path: &Path, factor: f32) -> Result<Vec<u8>, BackendError>;

    /// Resize to the exact dimensions in `params` and write an RGB JPEG.
    fn shrink(&self, params: &ShrinkParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    #[derive(Default)]
    pub struct MockBackend {
        pub identify_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
        /// Paths whose operations fail with `ProcessingFailed`.
        pub failing: Vec<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Brighten {
            source: String,
            factor: f32,
        },
        Shrink {
            source: String,
            output: String,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                identify_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        pub fn failing_on(mut self, path_suffix: &str) -> Self {
            self.failing.push(path_suffix.to_string());
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn check(&self, path: &Path) -> Result<(), BackendError> {
            let p = path.to_string_lossy();
            if self.failing.iter().any(|f| p.ends_with(f.as_str())) {
                return Err(BackendError::ProcessingFailed(format!("mock failure: {p}")));
            }
            Ok(())
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));
            self.check(path)?;

            self.identify_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }

        fn brighten(&self, path: &Path, factor: f32) -> Result<Vec<u8>, BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Brighten {
                source: path.to_string_lossy().to_string(),
                factor,
            });
            self.check(path)?;
            Ok(b"\x89PNG mock".to_vec())
        }

        fn shrink(&self, params: &ShrinkParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Shrink {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            self.check(&params.source)
        }
    }

    #[test]
    fn mock_records_identify() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let result = backend.identify(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(result.width, 800);
        assert_eq!(result.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_failure_is_reported_after_recording() {
        let backend = MockBackend::new().failing_on("bad.png");
        assert!(backend.brighten(Path::new("/x/bad.png"), 1.15).is_err());
        assert_eq!(backend.get_operations().len(), 1);
    }
}
