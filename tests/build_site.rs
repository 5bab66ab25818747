//! End-to-end: optimize an asset root, build the static site, and check the
//! pages a visitor would see.
//!
//! Run with: cargo test --test build_site

use herbario::assets::AssetResolver;
use herbario::catalog::Catalog;
use herbario::config::load_config;
use herbario::imaging::RustBackend;
use herbario::optimize::optimize_dir;
use herbario::query::{CategoryFilter, Query};
use herbario::render::render_to_string;
use herbario::site::build_site;
use herbario::view::{Session, ViewMode};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([40, 110, 60, 255]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Root with a config, a background, two large record images and one
/// broken file.
fn asset_root() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        r#"
        [site]
        title = "Herbário de Teste"

        [optimize]
        max_width = 80
        max_height = 120
        "#,
    )
    .unwrap();

    let images = tmp.path().join("imagens_plantas");
    fs::create_dir_all(&images).unwrap();
    write_png(&images.join("tribulus.png"), 240, 320);
    write_png(&images.join("serenoa.png"), 400, 200);
    fs::write(images.join("feno.png"), b"corrupted").unwrap();
    write_png(&tmp.path().join("fundo.png"), 8, 8);
    tmp
}

#[test]
fn optimize_then_build() {
    let root = asset_root();
    let config = load_config(root.path()).unwrap();
    let images = root.path().join(&config.assets.images_dir);

    let optimized = optimize_dir(&RustBackend::new(), &images, &config.optimize, true).unwrap();
    assert_eq!(optimized.failed(), 1);
    assert_eq!(
        image::image_dimensions(images.join("tribulus.jpg")).unwrap(),
        (80, 107)
    );
    assert_eq!(
        image::image_dimensions(images.join("serenoa.jpg")).unwrap(),
        (80, 40)
    );
    assert!(!images.join("tribulus.png").exists());

    let dist = root.path().join("dist");
    let mut assets = AssetResolver::new(root.path(), &config, Box::new(RustBackend::new()));
    let report = build_site(&config, &Catalog::builtin(), &mut assets, &dist).unwrap();

    assert!(report.has_background);
    assert!(!report.missing_images.contains(&"tribulus"));
    assert!(report.missing_images.contains(&"feno"));

    let index = fs::read_to_string(dist.join("index.html")).unwrap();
    assert!(index.contains("<title>Herbário de Teste</title>"));
    assert!(index.contains("data:image/jpeg;base64,"));
    assert!(index.contains("href=\"categoria-prostata.html\""));

    let prostata = fs::read_to_string(dist.join("categoria-prostata.html")).unwrap();
    assert!(prostata.contains("href=\"serenoa.html\""));
    assert!(!prostata.contains("href=\"tribulus.html\""));

    let feno = fs::read_to_string(dist.join("feno.html")).unwrap();
    assert!(feno.contains("Imagem não carregada"));
}

#[test]
fn sessions_are_independent() {
    let root = asset_root();
    let config = load_config(root.path()).unwrap();
    let catalog = Catalog::builtin();
    let mut assets = AssetResolver::without_imaging(root.path(), &config);

    let mut reader = Session::with_query(Query::new(CategoryFilter::parse("Hormonal"), ""));
    let browser = Session::new();

    reader.view.open_detail("bulbine");
    assert_eq!(browser.view.mode(), ViewMode::Gallery);

    let detail = render_to_string(&config, &catalog, &reader, &mut assets);
    assert!(detail.contains("⚠️ Atenção: Risco Elevado"));

    let gallery = render_to_string(&config, &catalog, &browser, &mut assets);
    assert_eq!(gallery.matches("class=\"plant-card\"").count(), 14);
    // No background without an image backend
    assert!(gallery.contains("background-color: var(--color-bg)"));

    reader.view.back();
    let back = render_to_string(&config, &catalog, &reader, &mut assets);
    assert_eq!(back.matches("class=\"plant-card\"").count(), 3);
}
