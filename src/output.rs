//! CLI output formatting for every command.
//!
//! Output is **information-first**: each line leads with what an entity is
//! (a plant, a page, an image) and shows file paths as secondary context.
//!
//! # Output Format
//!
//! ## List
//!
//! ```text
//! Plantas (3 of 14) · Categoria: Hormonal
//! 001 Tribulus
//!     Tribulus terrestris L.
//!     Categoria: Hormonal · Evidência: Moderado
//! ```
//!
//! ## Extract
//!
//! ```text
//! Source: livro pm desempenho fisico 2025.pdf (80 pages)
//! Page 9 tribulus → imagens_plantas/tribulus.png
//! Page 74 bulbine: skipped, document has 73 pages
//! Extracted 13 of 14 pages
//! ```
//!
//! ## Optimize
//!
//! ```text
//! maca.png → maca.jpg (1200x1600 → 800x1067)
//! feno.jpg: unchanged
//! Cache: 1 cached, 1 encoded (2 total)
//! ```
//!
//! ## Build
//!
//! ```text
//! Galeria → index.html (14 plants)
//! Categoria Hormonal → categoria-hormonal.html (3 plants)
//! 001 tribulus → tribulus.html
//! Generated 1 gallery, 5 category pages, 14 detail pages
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::catalog::PlantRecord;
use crate::extract::{ExtractReport, PageOutcome};
use crate::optimize::{FileOutcome, OptimizeReport};
use crate::query::Query;
use crate::site::{BuildReport, PageKind};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// `dir/file` using only the last directory component.
fn short_path(path: &Path) -> String {
    match path.parent().and_then(|p| p.file_name()) {
        Some(dir) => format!("{}/{}", dir.to_string_lossy(), display_name(path)),
        None => display_name(path),
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// List
// ============================================================================

pub fn format_list_output(records: &[&PlantRecord], total: usize, query: &Query) -> Vec<String> {
    let mut header = format!("Plantas ({} of {})", records.len(), total);
    if !query.category.is_all() {
        header.push_str(&format!(" · Categoria: {}", query.category));
    }
    if !query.search.is_empty() {
        header.push_str(&format!(" · Busca: \"{}\"", query.search));
    }

    let mut lines = vec![header];
    if records.is_empty() {
        lines.push("    Nenhuma planta encontrada.".to_string());
        return lines;
    }
    for (i, record) in records.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), record.common_name));
        lines.push(format!("    {}", record.scientific_name));
        lines.push(format!(
            "    Categoria: {} · Evidência: {}",
            record.category, record.evidence_level
        ));
    }
    lines
}

pub fn print_list_output(records: &[&PlantRecord], total: usize, query: &Query) {
    print_lines(format_list_output(records, total, query));
}

// ============================================================================
// Extract
// ============================================================================

pub fn format_extract_output(report: &ExtractReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Source: {} ({} pages)",
        display_name(&report.source),
        report.page_count
    )];

    for outcome in &report.outcomes {
        lines.push(match outcome {
            PageOutcome::Written { id, index, path } => {
                format!("Page {} {} → {}", index + 1, id, short_path(path))
            }
            PageOutcome::OutOfRange {
                id,
                index,
                page_count,
            } => format!(
                "Page {} {}: skipped, document has {} pages",
                index + 1,
                id,
                page_count
            ),
            PageOutcome::Failed { id, index, error } => {
                format!("Page {} {}: FAILED: {}", index + 1, id, error)
            }
        });
    }

    lines.push(format!(
        "Extracted {} of {} pages",
        report.written(),
        report.outcomes.len()
    ));
    lines
}

pub fn print_extract_output(report: &ExtractReport) {
    print_lines(format_extract_output(report));
}

// ============================================================================
// Optimize
// ============================================================================

pub fn format_optimize_output(report: &OptimizeReport) -> Vec<String> {
    let mut lines = Vec::new();
    if report.outcomes.is_empty() {
        lines.push(format!("No images in {}", report.dir.display()));
        return lines;
    }

    for outcome in &report.outcomes {
        lines.push(match outcome {
            FileOutcome::Optimized {
                source,
                output,
                original,
                size,
                ..
            } => format!(
                "{} → {} ({}x{} → {}x{})",
                display_name(source),
                display_name(output),
                original.0,
                original.1,
                size.0,
                size.1
            ),
            FileOutcome::Cached { path } => format!("{}: unchanged", display_name(path)),
            FileOutcome::Failed { source, error } => {
                format!("{}: FAILED: {}", display_name(source), error)
            }
        });
    }
    lines.push(format!("Cache: {}", report.cache_stats));
    if report.failed() > 0 {
        lines.push(format!("{} file(s) failed", report.failed()));
    }
    lines
}

pub fn print_optimize_output(report: &OptimizeReport) {
    print_lines(format_optimize_output(report));
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    let (mut galleries, mut categories, mut details) = (0, 0, 0);

    for page in &report.pages {
        match &page.kind {
            PageKind::Gallery => {
                galleries += 1;
                lines.push(format!("Galeria → {} ({} plants)", page.file, page.records));
            }
            PageKind::Category(label) => {
                categories += 1;
                lines.push(format!(
                    "Categoria {} → {} ({} plants)",
                    label, page.file, page.records
                ));
            }
            PageKind::Detail(id) => {
                details += 1;
                lines.push(format!("{} {} → {}", format_index(details), id, page.file));
            }
        }
    }

    if !report.missing_images.is_empty() {
        lines.push(format!(
            "Missing images: {}",
            report.missing_images.join(", ")
        ));
    }
    if !report.has_background {
        lines.push("Background: none, using flat color".to_string());
    }
    lines.push(format!(
        "Generated {} gallery, {} category pages, {} detail pages",
        galleries, categories, details
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    print_lines(format_build_output(report));
}
