//! Record image extraction from the source book.
//!
//! Each record's illustration lives on a known page of the book PDF. This
//! tool rasterizes those pages to `<images_dir>/<id>.png` so the asset
//! resolver can find them.
//!
//! ## Page Mapping
//!
//! `[extract.pages]` in config maps record id → page index counted from 0.
//! Pages are rendered at `zoom × 72` dpi (144 dpi with the default zoom of 2).
//!
//! ## Failure Handling
//!
//! | Situation | Outcome |
//! |---|---|
//! | Source PDF missing | [`ExtractError::MissingDocument`], nothing written |
//! | Page index past the end | [`PageOutcome::OutOfRange`], skipped |
//! | Rasterizer fails on one page | [`PageOutcome::Failed`], next page continues |
//! | Mapped id with a path separator or `..` | [`PageOutcome::Failed`], nothing written |
//!
//! ## Rasterizer
//!
//! Rendering goes through the [`PageRasterizer`] trait. [`PopplerRasterizer`]
//! shells out to poppler's `pdfinfo` and `pdftoppm`, which must be on `PATH`.

use crate::assets::is_safe_id;
use crate::config::ExtractConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{tool} exited with {status}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },
    #[error("Could not read page count: {0}")]
    PageCount(String),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source document not found: {0}")]
    MissingDocument(PathBuf),
    #[error("Rasterizer error: {0}")]
    Rasterize(#[from] RasterizeError),
}

/// Renders single PDF pages to PNG files.
pub trait PageRasterizer {
    /// Number of pages in the document.
    fn page_count(&self, pdf: &Path) -> Result<u32, RasterizeError>;

    /// Render the page at 0-based `index`, scaled by `zoom`, to a PNG at `output`.
    fn render_page(
        &self,
        pdf: &Path,
        index: u32,
        zoom: f32,
        output: &Path,
    ) -> Result<(), RasterizeError>;
}

/// Rasterizer backed by poppler-utils.
#[derive(Debug, Clone)]
pub struct PopplerRasterizer {
    pdfinfo: PathBuf,
    pdftoppm: PathBuf,
}

impl PopplerRasterizer {
    pub fn new() -> Self {
        Self {
            pdfinfo: PathBuf::from("pdfinfo"),
            pdftoppm: PathBuf::from("pdftoppm"),
        }
    }
}

impl Default for PopplerRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn run(tool: &'static str, command: &mut Command) -> Result<Vec<u8>, RasterizeError> {
    let output = command.output()?;
    if !output.status.success() {
        return Err(RasterizeError::CommandFailed {
            tool,
            status: output
                .status
                .code()
                .map_or_else(|| "signal".to_string(), |c| format!("status {c}")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output.stdout)
}

/// Pull the `Pages:` value out of `pdfinfo` output.
fn parse_page_count(info: &str) -> Result<u32, RasterizeError> {
    info.lines()
        .find_map(|line| line.strip_prefix("Pages:"))
        .ok_or_else(|| RasterizeError::PageCount("no Pages line".to_string()))?
        .trim()
        .parse()
        .map_err(|e| RasterizeError::PageCount(format!("{e}")))
}

impl PageRasterizer for PopplerRasterizer {
    fn page_count(&self, pdf: &Path) -> Result<u32, RasterizeError> {
        let stdout = run("pdfinfo", Command::new(&self.pdfinfo).arg(pdf))?;
        parse_page_count(&String::from_utf8_lossy(&stdout))
    }

    fn render_page(
        &self,
        pdf: &Path,
        index: u32,
        zoom: f32,
        output: &Path,
    ) -> Result<(), RasterizeError> {
        // pdftoppm numbers pages from 1 and appends `.png` to the prefix
        let page = (index + 1).to_string();
        let dpi = ((72.0 * zoom).round() as u32).to_string();
        let prefix = output.with_extension("");
        run(
            "pdftoppm",
            Command::new(&self.pdftoppm)
                .args(["-f", &page, "-l", &page, "-r", &dpi, "-png", "-singlefile"])
                .arg(pdf)
                .arg(&prefix),
        )?;
        Ok(())
    }
}

/// Result for one mapped page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Written {
        id: String,
        index: u32,
        path: PathBuf,
    },
    OutOfRange {
        id: String,
        index: u32,
        page_count: u32,
    },
    Failed {
        id: String,
        index: u32,
        error: String,
    },
}

/// Summary of an extraction run.
#[derive(Debug, Clone)]
pub struct ExtractReport {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub page_count: u32,
    pub outcomes: Vec<PageOutcome>,
}

impl ExtractReport {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, PageOutcome::Written { .. }))
            .count()
    }
}

/// Rasterize every mapped page of `pdf` into `output_dir`.
///
/// Pages are processed in page order.
pub fn extract_pages(
    rasterizer: &impl PageRasterizer,
    pdf: &Path,
    output_dir: &Path,
    config: &ExtractConfig,
) -> Result<ExtractReport, ExtractError> {
    let _span = tracing::debug_span!("extract_pages", pdf = %pdf.display()).entered();

    if !pdf.is_file() {
        return Err(ExtractError::MissingDocument(pdf.to_path_buf()));
    }
    let page_count = rasterizer.page_count(pdf)?;
    fs::create_dir_all(output_dir)?;

    let mut mapping: Vec<(&String, u32)> = config.pages.iter().map(|(id, &i)| (id, i)).collect();
    mapping.sort_by_key(|&(id, index)| (index, id.clone()));

    let mut outcomes = Vec::with_capacity(mapping.len());
    for (id, index) in mapping {
        let id = id.clone();
        if !is_safe_id(&id) {
            tracing::warn!(id = %id, index, "id is not a plain file name, skipping");
            outcomes.push(PageOutcome::Failed {
                id,
                index,
                error: "id must be a single file name".into(),
            });
            continue;
        }
        if index >= page_count {
            tracing::warn!(id = %id, index, page_count, "page out of range, skipping");
            outcomes.push(PageOutcome::OutOfRange {
                id,
                index,
                page_count,
            });
            continue;
        }

        let path = output_dir.join(format!("{id}.png"));
        match rasterizer.render_page(pdf, index, config.zoom, &path) {
            Ok(()) => {
                tracing::debug!(id = %id, index, path = %path.display(), "page extracted");
                outcomes.push(PageOutcome::Written { id, index, path });
            }
            Err(e) => {
                tracing::warn!(id = %id, index, error = %e, "page extraction failed");
                outcomes.push(PageOutcome::Failed {
                    id,
                    index,
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(ExtractReport {
        source: pdf.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        page_count,
        outcomes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Writes a marker file per page and records calls.
    struct MockRasterizer {
        pages: u32,
        failing: Vec<u32>,
        calls: Mutex<Vec<(u32, f32, PathBuf)>>,
    }

    impl MockRasterizer {
        fn new(pages: u32) -> Self {
            Self {
                pages,
                failing: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(mut self, index: u32) -> Self {
            self.failing.push(index);
            self
        }

        fn calls(&self) -> Vec<(u32, f32, PathBuf)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PageRasterizer for MockRasterizer {
        fn page_count(&self, _pdf: &Path) -> Result<u32, RasterizeError> {
            Ok(self.pages)
        }

        fn render_page(
            &self,
            _pdf: &Path,
            index: u32,
            zoom: f32,
            output: &Path,
        ) -> Result<(), RasterizeError> {
            self.calls
                .lock()
                .unwrap()
                .push((index, zoom, output.to_path_buf()));
            if self.failing.contains(&index) {
                return Err(RasterizeError::CommandFailed {
                    tool: "mock",
                    status: "status 1".into(),
                    stderr: "boom".into(),
                });
            }
            fs::write(output, format!("page {index}"))?;
            Ok(())
        }
    }

    fn setup_pdf() -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let pdf = tmp.path().join("livro.pdf");
        fs::write(&pdf, b"%PDF-1.4").unwrap();
        (tmp, pdf)
    }

    fn config(pages: &[(&str, u32)]) -> ExtractConfig {
        ExtractConfig {
            pages: pages
                .iter()
                .map(|(id, p)| (id.to_string(), *p))
                .collect::<BTreeMap<_, _>>(),
            ..ExtractConfig::default()
        }
    }

    #[test]
    fn missing_document_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("imagens_plantas");
        let rasterizer = MockRasterizer::new(100);
        let result = extract_pages(
            &rasterizer,
            &tmp.path().join("ausente.pdf"),
            &out,
            &ExtractConfig::default(),
        );
        assert!(matches!(result, Err(ExtractError::MissingDocument(_))));
        assert!(!out.exists());
        assert!(rasterizer.calls().is_empty());
    }

    #[test]
    fn default_mapping_renders_fourteen_pages_at_zoom_two() {
        let (tmp, pdf) = setup_pdf();
        let out = tmp.path().join("imagens_plantas");
        let rasterizer = MockRasterizer::new(100);

        let report = extract_pages(&rasterizer, &pdf, &out, &ExtractConfig::default()).unwrap();
        assert_eq!(report.written(), 14);
        assert_eq!(report.page_count, 100);
        assert!(out.join("tribulus.png").exists());
        assert!(out.join("bulbine.png").exists());

        let calls = rasterizer.calls();
        assert_eq!(calls[0].0, 8);
        assert_eq!(calls[13].0, 72);
        assert!(calls.iter().all(|(_, zoom, _)| *zoom == 2.0));
    }

    #[test]
    fn out_of_range_page_is_skipped() {
        let (tmp, pdf) = setup_pdf();
        let out = tmp.path().join("out");
        let rasterizer = MockRasterizer::new(10);

        let report = extract_pages(
            &rasterizer,
            &pdf,
            &out,
            &config(&[("tribulus", 8), ("maca", 13)]),
        )
        .unwrap();
        assert_eq!(report.written(), 1);
        assert!(report.outcomes.contains(&PageOutcome::OutOfRange {
            id: "maca".into(),
            index: 13,
            page_count: 10,
        }));
        assert!(!out.join("maca.png").exists());
    }

    #[test]
    fn index_equal_to_page_count_is_out_of_range() {
        let (tmp, pdf) = setup_pdf();
        let rasterizer = MockRasterizer::new(10);
        let report =
            extract_pages(&rasterizer, &pdf, tmp.path(), &config(&[("x", 10)])).unwrap();
        assert!(matches!(
            report.outcomes[0],
            PageOutcome::OutOfRange { .. }
        ));
    }

    #[test]
    fn failure_on_one_page_continues() {
        let (tmp, pdf) = setup_pdf();
        let out = tmp.path().join("out");
        let rasterizer = MockRasterizer::new(100).failing_on(13);

        let report = extract_pages(
            &rasterizer,
            &pdf,
            &out,
            &config(&[("tribulus", 8), ("maca", 13), ("ashwagandha", 18)]),
        )
        .unwrap();
        assert_eq!(report.written(), 2);
        assert!(matches!(
            &report.outcomes[1],
            PageOutcome::Failed { id, index: 13, .. } if id == "maca"
        ));
        assert!(out.join("ashwagandha.png").exists());
    }

    #[test]
    fn path_like_ids_never_leave_output_dir() {
        let (tmp, pdf) = setup_pdf();
        let out = tmp.path().join("imagens_plantas");
        let rasterizer = MockRasterizer::new(100);

        let report = extract_pages(
            &rasterizer,
            &pdf,
            &out,
            &config(&[("../fora", 3), ("sub/dir", 4), ("tribulus", 8)]),
        )
        .unwrap();
        assert_eq!(report.written(), 1);
        assert!(!tmp.path().join("fora.png").exists());
        assert!(matches!(
            &report.outcomes[0],
            PageOutcome::Failed { id, index: 3, .. } if id == "../fora"
        ));
        let written: Vec<PathBuf> = rasterizer.calls().into_iter().map(|c| c.2).collect();
        assert_eq!(written, vec![out.join("tribulus.png")]);
    }

    #[test]
    fn outcomes_follow_page_order() {
        let (tmp, pdf) = setup_pdf();
        let rasterizer = MockRasterizer::new(100);
        let report = extract_pages(
            &rasterizer,
            &pdf,
            tmp.path(),
            &config(&[("a", 30), ("b", 5), ("c", 12)]),
        )
        .unwrap();
        let order: Vec<u32> = rasterizer.calls().iter().map(|c| c.0).collect();
        assert_eq!(order, vec![5, 12, 30]);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[test]
    fn parse_pdfinfo_output() {
        let info = "Title:          Livro\nProducer:       x\nPages:          80\nEncrypted:      no\n";
        assert_eq!(parse_page_count(info).unwrap(), 80);
        assert!(parse_page_count("Title: x\n").is_err());
        assert!(parse_page_count("Pages: many\n").is_err());
    }

    #[test]
    fn poppler_missing_binary_is_io_error() {
        let (_tmp, pdf) = setup_pdf();
        let rasterizer = PopplerRasterizer {
            pdfinfo: PathBuf::from("/nonexistent/pdfinfo"),
            pdftoppm: PathBuf::from("/nonexistent/pdftoppm"),
        };
        assert!(matches!(
            rasterizer.page_count(&pdf),
            Err(RasterizeError::Io(_))
        ));
    }
}
