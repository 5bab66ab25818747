//! Asset resolution: record images, the page background and the logo.
//!
//! Every image the renderer embeds goes through [`AssetResolver`], which
//! reads the file once, checks that its header decodes, and hands back an
//! [`InlineImage`] ready to be dropped into a `data:` URI. Results are
//! memoized by path for the lifetime of the resolver, absent ones included,
//! so repeated render passes never touch the disk again.
//!
//! Nothing here fails loudly. A missing, unreadable or undecodable file is
//! logged at debug level and resolves to `None`; callers render a
//! placeholder instead.

use crate::config::{AssetsConfig, BackgroundConfig, SiteConfig};
use crate::imaging::{ImageBackend, brightened_png};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageReader;
use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// An image encoded for inline embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type detected from the file content, e.g. `image/png`.
    pub mime: String,
    /// Standard base64 of the raw file bytes.
    pub base64: String,
}

impl InlineImage {
    pub fn from_bytes(mime: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime: mime.into(),
            base64: STANDARD.encode(bytes),
        }
    }

    /// `data:<mime>;base64,<payload>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64)
    }
}

/// Memoizing loader for everything under the asset root.
pub struct AssetResolver {
    root: PathBuf,
    assets: AssetsConfig,
    background: BackgroundConfig,
    backend: Option<Box<dyn ImageBackend>>,
    cache: HashMap<PathBuf, Option<InlineImage>>,
    background_cache: Option<Option<InlineImage>>,
}

impl AssetResolver {
    /// Resolver with an image backend for the background adjustment.
    pub fn new(root: &Path, config: &SiteConfig, backend: Box<dyn ImageBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::without_imaging(root, config)
        }
    }

    /// Resolver without image processing. Record images still resolve, but
    /// the background is always absent.
    pub fn without_imaging(root: &Path, config: &SiteConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            assets: config.assets.clone(),
            background: config.background.clone(),
            backend: None,
            cache: HashMap::new(),
            background_cache: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Image for a record id, trying each configured extension in order.
    pub fn resolve_image(&mut self, id: &str) -> Option<InlineImage> {
        if !is_safe_id(id) {
            tracing::debug!(id, "rejecting record id with path components");
            return None;
        }

        let dir = self.root.join(&self.assets.images_dir);
        let candidates: Vec<PathBuf> = self
            .assets
            .extensions
            .iter()
            .map(|ext| dir.join(format!("{id}.{ext}")))
            .collect();

        candidates.iter().find_map(|path| self.load_cached(path))
    }

    /// Image at a path relative to the asset root.
    pub fn resolve_path(&mut self, relative: impl AsRef<Path>) -> Option<InlineImage> {
        let path = self.root.join(relative);
        self.load_cached(&path)
    }

    /// The brightened page background, computed once.
    pub fn resolve_background(&mut self) -> Option<InlineImage> {
        if let Some(cached) = &self.background_cache {
            return cached.clone();
        }
        let resolved = self.load_background();
        self.background_cache = Some(resolved.clone());
        resolved
    }

    /// Number of memoized paths, hits and misses alike.
    pub fn cached_paths(&self) -> usize {
        self.cache.len()
    }

    fn load_cached(&mut self, path: &Path) -> Option<InlineImage> {
        if let Some(cached) = self.cache.get(path) {
            return cached.clone();
        }
        let loaded = load_inline(path);
        self.cache.insert(path.to_path_buf(), loaded.clone());
        loaded
    }

    fn load_background(&self) -> Option<InlineImage> {
        let _span = tracing::debug_span!("resolve_background").entered();

        let Some(path) = self
            .background
            .candidates
            .iter()
            .map(|c| self.root.join(c))
            .find(|p| p.is_file())
        else {
            tracing::debug!("no background candidate found");
            return None;
        };

        let Some(backend) = &self.backend else {
            tracing::debug!(path = %path.display(), "no image backend, skipping background");
            return None;
        };

        match brightened_png(backend.as_ref(), &path, self.background.brightness) {
            Ok(bytes) => {
                tracing::debug!(
                    path = %path.display(),
                    factor = self.background.brightness,
                    bytes = bytes.len(),
                    "background brightened"
                );
                Some(InlineImage::from_bytes("image/png", &bytes))
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "background unavailable");
                None
            }
        }
    }
}

/// Ids are single file-name components.
pub(crate) fn is_safe_id(id: &str) -> bool {
    !id.is_empty() && !id.contains("..") && !id.chars().any(std::path::is_separator)
}

/// Read `path`, confirm the header decodes, and encode it.
fn load_inline(path: &Path) -> Option<InlineImage> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "asset not readable");
            return None;
        }
    };

    let reader = match ImageReader::new(Cursor::new(&bytes)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "asset format detection failed");
            return None;
        }
    };
    let Some(format) = reader.format() else {
        tracing::debug!(path = %path.display(), "asset is not a recognized image");
        return None;
    };
    if let Err(e) = reader.into_dimensions() {
        tracing::debug!(path = %path.display(), error = %e, "asset header does not decode");
        return None;
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "asset loaded");
    Some(InlineImage::from_bytes(format.to_mime_type(), &bytes))
}
