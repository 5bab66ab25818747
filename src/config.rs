//! Application configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `herbario` looks for `config.toml` in the asset root (`--root`, default the
//! current directory). `--config FILE` points at an explicit file instead.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "HERBÁRIO DIGITAL"
//! subtitle = "Guia de Plantas Medicinais e Desempenho Físico"
//! sidebar = "..."             # Markdown rendered in the sidebar
//! footer = "..."
//! # logo = "logo.png"         # Inline logo above the sidebar text
//! # logo_link = "https://..." # Where the logo points to
//!
//! [assets]
//! images_dir = "imagens_plantas"
//! extensions = ["png", "jpg", "jpeg", "webp"]
//!
//! [background]
//! candidates = ["fundo.png"]
//! brightness = 1.15
//!
//! [gallery]
//! categories = ["Todas", "Hormonal", "Adaptógeno", "Próstata", "Anabólico Natural", "Metabólico"]
//! columns = 4
//!
//! [colors]
//! primary = "#1a472a"
//! background = "#F7F5EB"      # Used when no background image resolves
//! ...
//!
//! [extract]
//! source_pdf = "livro pm desempenho fisico 2025.pdf"
//! zoom = 2.0
//!
//! [extract.pages]             # record id -> 0-based page index
//! tribulus = 8
//!
//! [optimize]
//! max_width = 800
//! max_height = 1200
//! quality = 75
//!
//! [processing]
//! max_processes = 4           # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::query::CategoryFilter;
use crate::slug::slugify;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Application configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Titles and sidebar content.
    pub site: SiteInfo,
    /// Where record images live and which extensions are tried.
    pub assets: AssetsConfig,
    /// Page background image and its brightness adjustment.
    pub background: BackgroundConfig,
    /// Category options and grid layout.
    pub gallery: GalleryConfig,
    /// Palette, emitted as CSS custom properties.
    pub colors: Palette,
    /// PDF page extraction tool.
    pub extract: ExtractConfig,
    /// Asset optimization tool.
    pub optimize: OptimizeConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.background.brightness.is_nan() || self.background.brightness <= 0.0 {
            return Err(ConfigError::Validation(
                "background.brightness must be greater than 0".into(),
            ));
        }
        if self.assets.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "assets.extensions must not be empty".into(),
            ));
        }
        if self.optimize.quality == 0 || self.optimize.quality > 100 {
            return Err(ConfigError::Validation(
                "optimize.quality must be 1-100".into(),
            ));
        }
        if self.optimize.max_width == 0 || self.optimize.max_height == 0 {
            return Err(ConfigError::Validation(
                "optimize.max_width and optimize.max_height must be non-zero".into(),
            ));
        }
        if self.extract.zoom.is_nan() || self.extract.zoom <= 0.0 {
            return Err(ConfigError::Validation(
                "extract.zoom must be greater than 0".into(),
            ));
        }
        if self.gallery.columns == 0 {
            return Err(ConfigError::Validation(
                "gallery.columns must be non-zero".into(),
            ));
        }
        let mut slugs: BTreeMap<String, String> = BTreeMap::new();
        for option in &self.gallery.categories {
            let CategoryFilter::Contains(label) = CategoryFilter::parse(option) else {
                continue;
            };
            let slug = slugify(&label);
            match slugs.get(&slug) {
                Some(existing) if *existing != label => {
                    return Err(ConfigError::Validation(format!(
                        "gallery.categories \"{existing}\" and \"{label}\" share the page name categoria-{slug}.html"
                    )));
                }
                Some(_) => {}
                None => {
                    slugs.insert(slug, label);
                }
            }
        }
        Ok(())
    }
}

/// Titles and sidebar content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub subtitle: String,
    /// Markdown rendered in the sidebar.
    pub sidebar: String,
    /// Small print at the bottom of the sidebar.
    pub footer: String,
    /// Logo image path, relative to the asset root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Link target for the logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_link: Option<String>,
}

const DEFAULT_SIDEBAR: &str = "\
### Autores do Livro

- **Thiago Abranches** (MSc. UFRJ)
- **Marina Ramos de Azevedo** (DSc. IFRJ)
- **Prof. Dr. Leopoldo C. Baratto** (DSc. UFRJ)

**USO EXCLUSIVO**: este aplicativo é destinado a profissionais prescritores \
habilitados, seu uso não substitui a avaliação clínica do profissional.
";

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "HERBÁRIO DIGITAL".to_string(),
            subtitle: "Guia de Plantas Medicinais e Desempenho Físico".to_string(),
            sidebar: DEFAULT_SIDEBAR.to_string(),
            footer: "Copyright © 2025 Thiago Abranches. Todos os direitos reservados.".to_string(),
            logo: None,
            logo_link: None,
        }
    }
}

/// Record image lookup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory holding `<id>.<ext>` files, relative to the asset root.
    pub images_dir: String,
    /// Extensions tried in order for each record id.
    pub extensions: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            images_dir: "imagens_plantas".to_string(),
            extensions: ["png", "jpg", "jpeg", "webp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Page background settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    /// Candidate files relative to the asset root; the first that exists wins.
    pub candidates: Vec<String>,
    /// Channel multiplier applied before inlining (1.0 = unchanged).
    pub brightness: f32,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            candidates: vec!["fundo.png".to_string()],
            brightness: 1.15,
        }
    }
}

/// Gallery layout and filter options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Options in the category selector. `"Todas"` means no filter.
    pub categories: Vec<String>,
    /// Cards per row on wide screens.
    pub columns: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            categories: [
                "Todas",
                "Hormonal",
                "Adaptógeno",
                "Próstata",
                "Anabólico Natural",
                "Metabólico",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            columns: 4,
        }
    }
}

/// Color palette.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    /// Headings, buttons, card borders.
    pub primary: String,
    /// Secondary headings and hover states.
    pub secondary: String,
    /// Card hover outline.
    pub accent: String,
    /// Evidence badge and strong-evidence banner.
    pub badge: String,
    /// Body text.
    pub text: String,
    /// Muted text (scientific names, captions).
    pub text_muted: String,
    /// Detail sheet background.
    pub paper: String,
    /// Flat page background when no background image resolves.
    pub background: String,
    /// Risk banner and safety heading.
    pub risk: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: "#1a472a".to_string(),
            secondary: "#2d5a3f".to_string(),
            accent: "#4CAF50".to_string(),
            badge: "#2e7d32".to_string(),
            text: "#2c3e50".to_string(),
            text_muted: "#666666".to_string(),
            paper: "#fffbf0".to_string(),
            background: "#F7F5EB".to_string(),
            risk: "#8B0000".to_string(),
        }
    }
}

/// PDF page extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractConfig {
    /// Source document, relative to the asset root.
    pub source_pdf: String,
    /// Render scale relative to the page's native 72 dpi.
    pub zoom: f32,
    /// Record id → 0-based page index.
    pub pages: BTreeMap<String, u32>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        let pages = [
            ("tribulus", 8),
            ("maca", 13),
            ("ashwagandha", 18),
            ("mucuna", 24),
            ("longjack", 29),
            ("serenoa", 34),
            ("ajuga", 39),
            ("prunus", 43),
            ("urtica", 48),
            ("feno", 53),
            ("tetradium", 58),
            ("cyanotis", 63),
            ("kaempferia", 67),
            ("bulbine", 72),
        ]
        .iter()
        .map(|(id, page)| (id.to_string(), *page))
        .collect();

        Self {
            source_pdf: "livro pm desempenho fisico 2025.pdf".to_string(),
            zoom: 2.0,
            pages,
        }
    }
}

/// Asset optimization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeConfig {
    /// Bounding box width; images are shrunk to fit, never enlarged.
    pub max_width: u32,
    /// Bounding box height.
    pub max_height: u32,
    /// JPEG quality (1-100).
    pub quality: u32,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            max_width: 800,
            max_height: 1200,
            quality: 75,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel optimization workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `config.toml` from `root`, falling back to stock defaults when absent.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let overlay = if config_path.exists() {
        Some(read_toml(&config_path)?)
    } else {
        None
    };
    resolve_config(overlay)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_file(path: &Path) -> Result<SiteConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    resolve_config(Some(read_toml(path)?))
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Herbário Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
title = "HERBÁRIO DIGITAL"
subtitle = "Guia de Plantas Medicinais e Desempenho Físico"
# Markdown rendered in the sidebar.
sidebar = """
### Autores do Livro

- **Thiago Abranches** (MSc. UFRJ)
- **Marina Ramos de Azevedo** (DSc. IFRJ)
- **Prof. Dr. Leopoldo C. Baratto** (DSc. UFRJ)
"""
footer = "Copyright © 2025 Thiago Abranches. Todos os direitos reservados."
# Logo shown above the sidebar text (path relative to the asset root).
# logo = "logo.png"
# logo_link = "https://www.plantaciencia.com/"

# ---------------------------------------------------------------------------
# Record images: <images_dir>/<id>.<ext>, extensions tried in order
# ---------------------------------------------------------------------------
[assets]
images_dir = "imagens_plantas"
extensions = ["png", "jpg", "jpeg", "webp"]

# ---------------------------------------------------------------------------
# Background image (first existing candidate wins; flat color otherwise)
# ---------------------------------------------------------------------------
[background]
candidates = ["fundo.png"]
brightness = 1.15

# ---------------------------------------------------------------------------
# Gallery
# ---------------------------------------------------------------------------
[gallery]
# Category selector options. "Todas" shows every record.
# A record matches when its category CONTAINS the option text.
categories = ["Todas", "Hormonal", "Adaptógeno", "Próstata", "Anabólico Natural", "Metabólico"]
columns = 4

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
primary = "#1a472a"
secondary = "#2d5a3f"
accent = "#4CAF50"
badge = "#2e7d32"
text = "#2c3e50"
text_muted = "#666666"
paper = "#fffbf0"
background = "#F7F5EB"    # Used when no background image is available
risk = "#8B0000"

# ---------------------------------------------------------------------------
# PDF page extraction (herbario extract)
# ---------------------------------------------------------------------------
[extract]
source_pdf = "livro pm desempenho fisico 2025.pdf"
# Render scale relative to 72 dpi (2.0 = 144 dpi).
zoom = 2.0

# Record id -> page index, counted from 0 (page 9 in a PDF reader is 8 here).
[extract.pages]
tribulus = 8
maca = 13
ashwagandha = 18
mucuna = 24
longjack = 29
serenoa = 34
ajuga = 39
prunus = 43
urtica = 48
feno = 53
tetradium = 58
cyanotis = 63
kaempferia = 67
bulbine = 72

# ---------------------------------------------------------------------------
# Asset optimization (herbario optimize)
# ---------------------------------------------------------------------------
[optimize]
# Images are shrunk to fit this box (never enlarged) and saved as JPEG.
max_width = 800
max_height = 1200
quality = 75

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel optimization workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from the palette.
pub fn generate_color_css(colors: &Palette) -> String {
    format!(
        r#":root {{
    --color-primary: {primary};
    --color-secondary: {secondary};
    --color-accent: {accent};
    --color-badge: {badge};
    --color-text: {text};
    --color-text-muted: {text_muted};
    --color-paper: {paper};
    --color-bg: {background};
    --color-risk: {risk};
}}"#,
        primary = colors.primary,
        secondary = colors.secondary,
        accent = colors.accent,
        badge = colors.badge,
        text = colors.text,
        text_muted = colors.text_muted,
        paper = colors.paper,
        background = colors.background,
        risk = colors.risk,
    )
}

/// Generate layout CSS from gallery settings.
pub fn generate_layout_css(gallery: &GalleryConfig) -> String {
    format!(
        ":root {{\n    --gallery-columns: {};\n}}",
        gallery.columns
    )
}
