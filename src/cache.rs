//! Skip cache for the asset optimizer.
//!
//! The optimizer rewrites the image directory in place: `maca.png` becomes
//! `maca.jpg` and the PNG is deleted. On the next run `maca.jpg` is itself a
//! candidate, and re-encoding it would lose quality for nothing. The manifest
//! records what each produced file looked like so unchanged outputs are left
//! alone.
//!
//! ## Cache keys
//!
//! Entries are keyed by output file name and hold two hashes:
//!
//! - **`output_hash`**: SHA-256 of the JPEG the optimizer wrote. If the file
//!   on disk still hashes to this, nobody has replaced it since.
//! - **`params_hash`**: SHA-256 of the bounding box and quality. Changing
//!   `[optimize]` settings invalidates every entry.
//!
//! A file is skipped only when both match.
//!
//! ## Storage
//!
//! `<images_dir>/.optimize-manifest.json`. `--no-cache` starts from an empty
//! manifest; the fresh one is still written at the end.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

const MANIFEST_FILENAME: &str = ".optimize-manifest.json";

/// Bump to invalidate every existing manifest.
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheEntry {
    pub output_hash: String,
    pub params_hash: String,
}

/// Output file name → entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeManifest {
    pub version: u32,
    pub entries: BTreeMap<String, CacheEntry>,
}

impl OptimizeManifest {
    pub fn empty() -> Self {
        Self {
            version: MANIFEST_VERSION,
            entries: BTreeMap::new(),
        }
    }

    /// Load from `dir`. Missing, corrupt or outdated manifests load empty.
    pub fn load(dir: &Path) -> Self {
        let content = match std::fs::read_to_string(manifest_path(dir)) {
            Ok(c) => c,
            Err(_) => return Self::empty(),
        };
        match serde_json::from_str::<Self>(&content) {
            Ok(m) if m.version == MANIFEST_VERSION => m,
            _ => Self::empty(),
        }
    }

    pub fn save(&self, dir: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(dir), json)
    }

    /// True when `file_name` was produced by us with these params and has
    /// not changed since.
    pub fn is_current(&self, file_name: &str, file_hash: &str, params_hash: &str) -> bool {
        self.entries
            .get(file_name)
            .is_some_and(|e| e.output_hash == file_hash && e.params_hash == params_hash)
    }

    pub fn insert(&mut self, file_name: String, output_hash: String, params_hash: String) {
        self.entries.insert(
            file_name,
            CacheEntry {
                output_hash,
                params_hash,
            },
        );
    }

    /// Drop entries whose file no longer exists in `dir`.
    pub fn prune(&mut self, dir: &Path) {
        self.entries.retain(|name, _| dir.join(name).is_file());
    }
}

/// SHA-256 of a file's contents, as hex.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

/// SHA-256 of the shrink parameters.
pub fn hash_shrink_params(max: (u32, u32), quality: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"shrink-jpeg\0");
    hasher.update(max.0.to_le_bytes());
    hasher.update(max.1.to_le_bytes());
    hasher.update(quality.to_le_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn manifest_path(dir: &Path) -> PathBuf {
    dir.join(MANIFEST_FILENAME)
}

/// Per-run cache counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u32,
    pub misses: u32,
}

impl CacheStats {
    pub fn hit(&mut self) {
        self.hits += 1;
    }

    pub fn miss(&mut self) {
        self.misses += 1;
    }

    pub fn total(&self) -> u32 {
        self.hits + self.misses
    }
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hits > 0 {
            write!(
                f,
                "{} cached, {} encoded ({} total)",
                self.hits,
                self.misses,
                self.total()
            )
        } else {
            write!(f, "{} encoded", self.misses)
        }
    }
}
