//! In-place optimization of the record image directory.
//!
//! Every `.png`, `.jpg` or `.jpeg` file (extension in any case) directly
//! inside the directory is shrunk to fit the configured box, never enlarged,
//! and written as `<stem>.jpg`. When the source had a different name the
//! original is deleted, so after a run the directory holds only JPEGs.
//!
//! ## Parallelism
//!
//! Files are processed on the rayon pool. Sources that would write the same
//! output (`maca.png` and `maca.jpg`) form one group and run sequentially:
//! the existing `<stem>.jpg` first, then the others in name order, so the
//! newest non-JPEG source ends up as the output.
//!
//! ## Failures
//!
//! A missing directory aborts with [`OptimizeError::MissingDirectory`]. A file
//! that fails to decode or encode becomes [`FileOutcome::Failed`] and the run
//! continues.
//!
//! Unchanged outputs from a previous run are skipped through the manifest in
//! [`crate::cache`].

use crate::cache::{self, CacheStats, OptimizeManifest};
use crate::config::OptimizeConfig;
use crate::imaging::{ImageBackend, Quality, ShrinkConfig, shrink_to_jpeg};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const SOURCE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory not found: {0}")]
    MissingDirectory(PathBuf),
}

/// Result for one source file.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Optimized {
        source: PathBuf,
        output: PathBuf,
        original: (u32, u32),
        size: (u32, u32),
        removed_original: bool,
    },
    Cached {
        path: PathBuf,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

#[derive(Debug, Clone)]
pub struct OptimizeReport {
    pub dir: PathBuf,
    pub outcomes: Vec<FileOutcome>,
    pub cache_stats: CacheStats,
}

impl OptimizeReport {
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Optimize every image file directly inside `dir`.
pub fn optimize_dir(
    backend: &impl ImageBackend,
    dir: &Path,
    config: &OptimizeConfig,
    use_cache: bool,
) -> Result<OptimizeReport, OptimizeError> {
    let _span = tracing::debug_span!("optimize_dir", dir = %dir.display(), use_cache).entered();

    if !dir.is_dir() {
        return Err(OptimizeError::MissingDirectory(dir.to_path_buf()));
    }

    let shrink = ShrinkConfig {
        max: (config.max_width, config.max_height),
        quality: Quality::new(config.quality),
    };
    let params_hash = cache::hash_shrink_params(shrink.max, shrink.quality.value());
    let mut manifest = if use_cache {
        OptimizeManifest::load(dir)
    } else {
        OptimizeManifest::empty()
    };

    let groups = group_by_output(scan_sources(dir));
    tracing::debug!(groups = groups.len(), "sources grouped by output");

    let results: Vec<Vec<FileOutcome>> = groups
        .par_iter()
        .map(|(output, sources)| {
            sources
                .iter()
                .map(|source| {
                    optimize_file(backend, source, output, dir, &shrink, &manifest, &params_hash)
                })
                .collect()
        })
        .collect();

    let outcomes: Vec<FileOutcome> = results.into_iter().flatten().collect();

    let mut cache_stats = CacheStats::default();
    for outcome in &outcomes {
        match outcome {
            FileOutcome::Cached { .. } => cache_stats.hit(),
            FileOutcome::Optimized { output, .. } => {
                cache_stats.miss();
                record_output(&mut manifest, output, &params_hash);
            }
            FileOutcome::Failed { .. } => {}
        }
    }
    manifest.prune(dir);
    manifest.save(dir)?;

    Ok(OptimizeReport {
        dir: dir.to_path_buf(),
        outcomes,
        cache_stats,
    })
}

/// Image files directly inside `dir`, sorted by name.
fn scan_sources(dir: &Path) -> Vec<PathBuf> {
    let mut sources: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_source(p))
        .collect();
    sources.sort();
    sources
}

fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SOURCE_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Output path → sources, the one already at the output path first.
fn group_by_output(sources: Vec<PathBuf>) -> BTreeMap<PathBuf, Vec<PathBuf>> {
    let mut groups: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for source in sources {
        let output = source.with_file_name(format!("{}.jpg", stem(&source)));
        groups.entry(output).or_default().push(source);
    }
    for (output, sources) in groups.iter_mut() {
        sources.sort_by_key(|s| s != output);
    }
    groups
}

fn optimize_file(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    dir: &Path,
    shrink: &ShrinkConfig,
    manifest: &OptimizeManifest,
    params_hash: &str,
) -> FileOutcome {
    if source == output && is_unchanged(manifest, output, params_hash) {
        tracing::debug!(path = %output.display(), "unchanged since last run");
        return FileOutcome::Cached {
            path: output.to_path_buf(),
        };
    }

    let result = match shrink_to_jpeg(backend, source, dir, &stem(source), shrink) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(source = %source.display(), error = %e, "optimization failed");
            return FileOutcome::Failed {
                source: source.to_path_buf(),
                error: e.to_string(),
            };
        }
    };

    let removed_original = if source != result.params.output {
        match fs::remove_file(source) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(source = %source.display(), error = %e, "could not remove original");
                false
            }
        }
    } else {
        false
    };

    tracing::debug!(
        source = %source.display(),
        width = result.params.width,
        height = result.params.height,
        "optimized"
    );
    FileOutcome::Optimized {
        source: source.to_path_buf(),
        output: result.params.output,
        original: result.original,
        size: (result.params.width, result.params.height),
        removed_original,
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn is_unchanged(manifest: &OptimizeManifest, path: &Path, params_hash: &str) -> bool {
    let (Some(name), Ok(hash)) = (file_name(path), cache::hash_file(path)) else {
        return false;
    };
    manifest.is_current(&name, &hash, params_hash)
}

fn record_output(manifest: &mut OptimizeManifest, output: &Path, params_hash: &str) {
    let Some(name) = file_name(output) else {
        return;
    };
    match cache::hash_file(output) {
        Ok(hash) => manifest.insert(name, hash, params_hash.to_string()),
        Err(e) => tracing::debug!(path = %output.display(), error = %e, "output not hashed"),
    }
}
