//! Static site build.
//!
//! Pre-renders every page a visitor can reach into a flat directory of
//! self-contained HTML files:
//!
//! ```text
//! dist/
//! ├── index.html                      # Gallery, every record
//! ├── categoria-hormonal.html         # Gallery filtered by each category option
//! ├── categoria-adaptogeno.html
//! ├── ...
//! ├── tribulus.html                   # Detail page per record
//! └── ...
//! ```
//!
//! Images are inlined, so the directory has no other assets. The resolver is
//! shared across pages, so each image and the background are read once.

use crate::assets::AssetResolver;
use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::query::{CategoryFilter, Query};
use crate::render::{self, category_href, detail_href};
use crate::view::Session;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What a built page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    Gallery,
    Category(String),
    Detail(&'static str),
}

/// One written file.
#[derive(Debug, Clone)]
pub struct BuiltPage {
    pub file: String,
    pub kind: PageKind,
    /// Records shown on the page (1 for detail pages).
    pub records: usize,
    pub bytes: usize,
}

/// Summary of a build, for CLI output.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub pages: Vec<BuiltPage>,
    /// Records with no resolvable image.
    pub missing_images: Vec<&'static str>,
    pub has_background: bool,
}

/// Render and write every page into `output_dir`, creating it if needed.
pub fn build_site(
    config: &SiteConfig,
    catalog: &Catalog,
    assets: &mut AssetResolver,
    output_dir: &Path,
) -> Result<BuildReport, SiteError> {
    let _span = tracing::debug_span!("build_site", output = %output_dir.display()).entered();
    fs::create_dir_all(output_dir)?;

    let mut pages = Vec::new();

    // Gallery and category pages
    let mut filters = vec![CategoryFilter::All];
    let mut seen_files = BTreeSet::from([category_href(&CategoryFilter::All)]);
    for option in &config.gallery.categories {
        let filter = CategoryFilter::parse(option);
        let href = category_href(&filter);
        if seen_files.insert(href.clone()) {
            filters.push(filter);
        } else if !filters.contains(&filter) {
            tracing::warn!(
                category = %filter,
                file = %href,
                "category page name already taken by another option, skipping"
            );
        }
    }

    for filter in filters {
        let session = Session::with_query(Query::new(filter.clone(), ""));
        let shown = session.query.apply(catalog.records()).len();
        let kind = match &filter {
            CategoryFilter::All => PageKind::Gallery,
            CategoryFilter::Contains(label) => PageKind::Category(label.clone()),
        };
        pages.push(write_page(
            config,
            catalog,
            assets,
            output_dir,
            &session,
            category_href(&filter),
            kind,
            shown,
        )?);
    }

    // Detail pages
    for record in catalog.records() {
        let mut session = Session::new();
        session.view.open_detail(record.id);
        pages.push(write_page(
            config,
            catalog,
            assets,
            output_dir,
            &session,
            detail_href(record.id),
            PageKind::Detail(record.id),
            1,
        )?);
    }

    let missing_images = catalog
        .records()
        .iter()
        .filter(|r| assets.resolve_image(r.id).is_none())
        .map(|r| r.id)
        .collect();

    Ok(BuildReport {
        output_dir: output_dir.to_path_buf(),
        pages,
        missing_images,
        has_background: assets.resolve_background().is_some(),
    })
}

#[allow(clippy::too_many_arguments)]
fn write_page(
    config: &SiteConfig,
    catalog: &Catalog,
    assets: &mut AssetResolver,
    output_dir: &Path,
    session: &Session,
    file: String,
    kind: PageKind,
    records: usize,
) -> Result<BuiltPage, SiteError> {
    let html = render::render_to_string(config, catalog, session, assets);
    fs::write(output_dir.join(&file), &html)?;
    tracing::debug!(file = %file, bytes = html.len(), "page written");
    Ok(BuiltPage {
        file,
        kind,
        records,
        bytes: html.len(),
    })
}
