//! # Herbário
//!
//! A digital herbarium of medicinal plants used in physical-performance
//! practice. A fixed catalog of monographs is browsed as a filterable gallery
//! and opened one record at a time as a detail sheet, with images inlined
//! from an asset directory.
//!
//! # Architecture
//!
//! Every render pass reads an explicit [`view::Session`] and produces one
//! self-contained HTML document:
//!
//! ```text
//! Session ─┬─ ViewState ── gallery? ── Query Engine ──┐
//!          │                                          ├── Renderer ── HTML
//!          └─ Query     ── detail?  ── Catalog::find ─┘       ▲
//!                                                             │
//!                                      Asset Resolver ────────┘
//!                                      (memoized, inline base64)
//! ```
//!
//! Two offline tools prepare the asset directory: [`extract`] rasterizes the
//! illustration pages of the source book and [`optimize`] shrinks and
//! re-encodes whatever is there.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | The fixed, ordered table of plant records |
//! | [`query`] | Category + search filtering over the catalog |
//! | [`view`] | Gallery/detail navigation state and the per-client session |
//! | [`assets`] | Memoized image lookup, background brightening, data URIs |
//! | [`render`] | Maud templates for the gallery and detail views |
//! | [`site`] | Pre-renders every reachable page into a directory |
//! | [`extract`] | PDF page → PNG extraction through a pluggable rasterizer |
//! | [`optimize`] | In-place shrink-to-JPEG of the asset directory |
//! | [`cache`] | Skip manifest for the optimizer |
//! | [`imaging`] | Pure-Rust image operations: identify, brighten, shrink |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`output`] | CLI output formatting for every command |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`slug`] | Accent-folding slugs for category page names |
//!
//! # Design Decisions
//!
//! ## Static Records
//!
//! The catalog is a `static` slice of `&'static str` records. There is no
//! database and nothing to load at startup; editing the herbarium means
//! editing [`catalog::PLANTS`] and rebuilding.
//!
//! ## Nothing Global
//!
//! Navigation state lives in a [`view::Session`] passed to each render pass.
//! Tests build as many independent sessions as they like.
//!
//! ## Soft Asset Failures
//!
//! A missing or broken image never stops a render. The resolver answers
//! `None`, logs at debug level, and the page shows a placeholder.

pub mod assets;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod extract;
pub mod imaging;
pub mod logging;
pub mod optimize;
pub mod output;
pub mod query;
pub mod render;
pub mod site;
pub mod slug;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
