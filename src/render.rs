//! HTML rendering.
//!
//! One render pass turns a [`Session`] into a complete HTML document:
//!
//! - **Gallery** (`ViewMode::Gallery`): search box, result count and a grid of
//!   cards for the records that pass the session's [`Query`](crate::query::Query).
//! - **Detail** (`ViewMode::Detail`): the full monograph of the selected
//!   record, or an empty state when the id does not resolve.
//!
//! Both share a sidebar (logo, category links, markdown text) and a header.
//! Every image is inlined as a `data:` URI through the [`AssetResolver`], so a
//! rendered page is a single self-contained file.
//!
//! ## Links
//!
//! Pages link to each other with relative file names, which is also the
//! layout [`crate::site`] writes:
//!
//! | Target | File |
//! |---|---|
//! | Gallery, no category | `index.html` |
//! | Gallery, category `C` | `categoria-<slug(C)>.html` |
//! | Detail of `id` | `<id>.html` |
//!
//! ## Styling
//!
//! `static/style.css` and `static/gallery.js` are embedded at compile time.
//! The palette and grid width come from config as CSS custom properties. The
//! background is the brightened image from the resolver, or a flat
//! `--color-bg` when none resolves.
//!
//! Uses [maud](https://maud.lambda.xyz/), so every catalog string and every
//! piece of user input is escaped on the way out.

use crate::assets::{AssetResolver, InlineImage};
use crate::catalog::{Catalog, PlantRecord};
use crate::config::{self, SiteConfig};
use crate::query::CategoryFilter;
use crate::slug::slugify;
use crate::view::{Session, ViewMode};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};

const CSS_STATIC: &str = include_str!("../static/style.css");
const JS: &str = include_str!("../static/gallery.js");

pub const GALLERY_HREF: &str = "index.html";

/// File name of a record's detail page.
pub fn detail_href(id: &str) -> String {
    format!("{id}.html")
}

/// File name of the gallery filtered by a category option.
pub fn category_href(filter: &CategoryFilter) -> String {
    match filter {
        CategoryFilter::All => GALLERY_HREF.to_string(),
        CategoryFilter::Contains(label) => format!("categoria-{}.html", slugify(label)),
    }
}

/// Render one full page for the session's current view.
pub fn render_page(
    config: &SiteConfig,
    catalog: &Catalog,
    session: &Session,
    assets: &mut AssetResolver,
) -> Markup {
    let _span = tracing::debug_span!("render_page", mode = %session.view.mode()).entered();

    let background = assets.resolve_background();
    let css = page_css(config, background.as_ref());
    let sidebar = render_sidebar(config, &session.query.category, assets);

    let (title, main) = match session.view.mode() {
        ViewMode::Gallery => {
            let records = session.query.apply(catalog.records());
            tracing::debug!(shown = records.len(), "gallery filtered");
            let main = render_gallery(&records, session, assets);
            (config.site.title.clone(), main)
        }
        ViewMode::Detail => match session.view.selected_record(catalog) {
            Some(record) => {
                let title = format!("{} | {}", record.common_name, config.site.title);
                (title, render_detail(record, assets))
            }
            None => {
                tracing::debug!(
                    id = session.view.selected_id().unwrap_or(""),
                    "detail requested for unknown record"
                );
                (config.site.title.clone(), render_missing_detail())
            }
        },
    };

    let content = html! {
        div.layout {
            (sidebar)
            div.content {
                (site_header(config))
                (main)
            }
        }
    };

    base_document(&title, &css, content)
}

/// Render a page straight to an HTML string.
pub fn render_to_string(
    config: &SiteConfig,
    catalog: &Catalog,
    session: &Session,
    assets: &mut AssetResolver,
) -> String {
    render_page(config, catalog, session, assets).into_string()
}

// ============================================================================
// CSS
// ============================================================================

/// Palette, layout, embedded stylesheet and the background rule.
fn page_css(config: &SiteConfig, background: Option<&InlineImage>) -> String {
    let colors = config::generate_color_css(&config.colors);
    let layout = config::generate_layout_css(&config.gallery);
    format!(
        "{colors}\n\n{layout}\n\n{CSS_STATIC}\n\n{}",
        background_css(background)
    )
}

fn background_css(background: Option<&InlineImage>) -> String {
    match background {
        Some(img) => format!(
            "body {{\n    background-image: url(\"{}\");\n    background-size: cover;\n    background-attachment: fixed;\n}}",
            img.data_uri()
        ),
        None => "body {\n    background-color: var(--color-bg);\n}".to_string(),
    }
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, css: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
                script { (PreEscaped(JS)) }
            }
        }
    }
}

fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            h1 { a href=(GALLERY_HREF) { (config.site.title) } }
            p.subtitle { (config.site.subtitle) }
        }
    }
}

fn render_sidebar(
    config: &SiteConfig,
    current: &CategoryFilter,
    assets: &mut AssetResolver,
) -> Markup {
    let logo = config
        .site
        .logo
        .as_deref()
        .and_then(|path| assets.resolve_path(path));

    let parser = Parser::new(&config.site.sidebar);
    let mut sidebar_html = String::new();
    md_html::push_html(&mut sidebar_html, parser);

    html! {
        aside.sidebar {
            @if let Some(logo) = &logo {
                div.logo {
                    @if let Some(link) = &config.site.logo_link {
                        a href=(link) target="_blank" rel="noopener" {
                            img src=(logo.data_uri()) alt="Logo";
                        }
                    } @else {
                        img src=(logo.data_uri()) alt="Logo";
                    }
                }
            }
            nav.categories {
                h3 { "Categorias" }
                ul {
                    @for option in &config.gallery.categories {
                        @let filter = CategoryFilter::parse(option);
                        @let is_current = &filter == current;
                        li class=[is_current.then_some("current")] {
                            a href=(category_href(&filter)) { (option) }
                        }
                    }
                }
            }
            div.sidebar-text {
                (PreEscaped(sidebar_html))
            }
            p.sidebar-footer { (config.site.footer) }
        }
    }
}

/// Inline image, or a placeholder box with `missing_text`.
fn figure_image(image: Option<&InlineImage>, alt: &str, missing_text: &str) -> Markup {
    html! {
        @if let Some(img) = image {
            img src=(img.data_uri()) alt=(alt) loading="lazy";
        } @else {
            div.placeholder { (missing_text) }
        }
    }
}

// ============================================================================
// Views
// ============================================================================

fn render_gallery(records: &[&PlantRecord], session: &Session, assets: &mut AssetResolver) -> Markup {
    let query = &session.query;
    html! {
        main.gallery-page {
            form.search role="search" {
                input #search type="search" name="q"
                    placeholder="Buscar por nome ou descrição..."
                    value=(query.search) autocomplete="off";
            }
            @if !query.category.is_all() {
                p.active-category { "Categoria: " strong { (query.category.to_string()) } }
            }
            p.result-count {
                span.count { (records.len()) }
                " planta(s) encontrada(s)"
            }
            div.plant-grid {
                @for record in records {
                    (render_card(record, assets))
                }
            }
            p.empty-results hidden[!records.is_empty()] {
                "Nenhuma planta encontrada."
            }
        }
    }
}

fn render_card(record: &PlantRecord, assets: &mut AssetResolver) -> Markup {
    let image = assets.resolve_image(record.id);
    let search_key = format!(
        "{}\n{}",
        record.common_name.to_lowercase(),
        record.description.to_lowercase()
    );
    html! {
        a.plant-card href=(detail_href(record.id)) data-search=(search_key) data-category=(record.category) {
            div.card-image {
                (figure_image(image.as_ref(), record.common_name, "Imagem Indisponível"))
            }
            div.card-body {
                h3 { (record.common_name) }
                p.scientific { em { (record.scientific_name) } }
                p.card-category { (record.category) }
                span class={ "badge " (record.evidence_tone().css_class()) } {
                    "Evidência: " (record.evidence_level)
                }
                span.card-link { "Ver Detalhes" }
            }
        }
    }
}

fn render_detail(record: &PlantRecord, assets: &mut AssetResolver) -> Markup {
    let image = assets.resolve_image(record.id);
    let tone = record.evidence_tone();
    html! {
        main.detail-page {
            a.back href=(GALLERY_HREF) { "← Voltar ao Herbário" }
            article.detail-sheet {
                header.detail-header {
                    h2 { (record.common_name) }
                    p.scientific { em { (record.scientific_name) } }
                }
                div.detail-grid {
                    figure.detail-figure {
                        (figure_image(image.as_ref(), record.common_name, "Imagem não carregada"))
                        figcaption { "Fig. 1: " (record.common_name) }
                    }
                    div.detail-body {
                        div class={ "evidence-banner " (tone.css_class()) } {
                            (record.evidence_banner())
                        }
                        dl.facts {
                            dt { "Categoria" }
                            dd { (record.category) }
                            dt { "Evidência" }
                            dd { span class={ "badge " (tone.css_class()) } { (record.evidence_level) } }
                        }
                        section {
                            h3 { "Descrição" }
                            p { (record.description) }
                        }
                        section {
                            h3 { "Mecanismo" }
                            p { (record.mechanism) }
                        }
                        section {
                            h3 { "Dosagem Usual" }
                            p { (record.dosage) }
                        }
                        section.safety {
                            h3 { "Perfil de Segurança" }
                            h4 { "Efeitos Adversos" }
                            p { (record.adverse_effects) }
                            h4 { "Contraindicações" }
                            p { (record.contraindications) }
                            h4 { "Interações" }
                            p { (record.interactions) }
                        }
                    }
                }
            }
        }
    }
}

fn render_missing_detail() -> Markup {
    html! {
        main.detail-page.detail-missing {
            a.back href=(GALLERY_HREF) { "← Voltar ao Herbário" }
            p.empty-results { "Planta não encontrada." }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::RustBackend;
    use crate::query::Query;
    use crate::test_helpers::{setup_asset_root, write_solid_png};
    use std::path::Path;
    use tempfile::TempDir;

    fn render(root: &Path, config: &SiteConfig, session: &Session) -> String {
        let mut assets = AssetResolver::new(root, config, Box::new(RustBackend::new()));
        render_to_string(config, &Catalog::builtin(), session, &mut assets)
    }

    fn gallery(category: &str, search: &str) -> Session {
        Session::with_query(Query::new(CategoryFilter::parse(category), search))
    }

    fn detail(id: &str) -> Session {
        let mut session = Session::new();
        session.view.open_detail(id);
        session
    }

    fn card_count(html: &str) -> usize {
        html.matches("class=\"plant-card\"").count()
    }

    #[test]
    fn hrefs() {
        assert_eq!(detail_href("maca"), "maca.html");
        assert_eq!(category_href(&CategoryFilter::All), "index.html");
        assert_eq!(
            category_href(&CategoryFilter::parse("Anabólico Natural")),
            "categoria-anabolico-natural.html"
        );
    }

    #[test]
    fn search_input_carries_id_and_query() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &gallery("", "bulb"));
        assert!(html.contains("id=\"search\""));
        assert!(html.contains("type=\"search\""));
        assert!(html.contains("value=\"bulb\""));
    }

    #[test]
    fn document_structure() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &Session::new());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>HERBÁRIO DIGITAL</title>"));
        assert!(html.contains("Guia de Plantas Medicinais e Desempenho Físico"));
        assert!(html.contains("--color-primary: #1a472a"));
    }

    #[test]
    fn default_gallery_shows_every_record() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &Session::new());
        assert_eq!(card_count(&html), 14);
        assert!(html.contains("href=\"tribulus.html\""));
        assert!(html.contains("href=\"bulbine.html\""));
        assert!(html.contains("<span class=\"count\">14</span>"));
    }

    #[test]
    fn hormonal_filter() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &gallery("Hormonal", ""));
        assert!(html.contains("href=\"tribulus.html\""));
        assert!(html.contains("href=\"bulbine.html\""));
        assert!(!html.contains("href=\"serenoa.html\""));
        assert!(!html.contains("href=\"prunus.html\""));
        assert_eq!(card_count(&html), 3);
    }

    #[test]
    fn search_narrows_and_no_match_shows_empty_state() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &gallery("Todas", "maca"));
        assert_eq!(card_count(&html), 1);
        assert!(html.contains("Maca Peruana"));
        assert!(html.contains("<p class=\"empty-results\" hidden>"));

        let html = render(tmp.path(), &SiteConfig::default(), &gallery("Todas", "zzz"));
        assert_eq!(card_count(&html), 0);
        assert!(html.contains("<p class=\"empty-results\">"));
    }

    #[test]
    fn current_category_is_marked() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &gallery("Próstata", ""));
        assert!(html.contains(
            "<li class=\"current\"><a href=\"categoria-prostata.html\">Próstata</a></li>"
        ));
        assert!(html.contains("Categoria: <strong>Próstata</strong>"));
    }

    #[test]
    fn card_embeds_resolved_image_and_placeholder_otherwise() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &Session::new());
        // tribulus.png and maca.jpg exist, the rest do not
        assert!(html.contains("src=\"data:image/png;base64,"));
        assert!(html.contains("src=\"data:image/jpeg;base64,"));
        assert_eq!(html.matches("Imagem Indisponível").count(), 12);
    }

    #[test]
    fn card_carries_lowercase_search_key() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &gallery("", "maca"));
        assert!(html.contains("data-search=\"maca peruana\n"));
        assert!(html.contains("data-category=\"Adaptógeno\""));
    }

    #[test]
    fn detail_of_risk_record() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &detail("bulbine"));
        assert!(html.contains("<title>Bulbine | HERBÁRIO DIGITAL</title>"));
        assert!(html.contains("evidence-banner tone-risk"));
        assert!(html.contains("⚠️ Atenção: Risco Elevado"));
        assert!(html.contains("Perfil de Segurança"));
        assert!(html.contains("← Voltar ao Herbário"));
        assert!(html.contains("Fig. 1: Bulbine"));
        // No image on disk for bulbine
        assert!(html.contains("Imagem não carregada"));
        assert_eq!(card_count(&html), 0);
    }

    #[test]
    fn detail_with_image_and_strong_evidence() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &detail("maca"));
        assert!(html.contains("evidence-banner tone-strong"));
        assert!(html.contains("Nível Alto: Estudos Clínicos Robustos"));
        assert!(html.contains("src=\"data:image/jpeg;base64,"));
        assert!(!html.contains("Imagem não carregada"));
    }

    #[test]
    fn detail_caution_banner_names_level() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &detail("cyanotis"));
        assert!(html.contains("evidence-banner tone-caution"));
        assert!(html.contains("Nível: Muito Baixo"));
    }

    #[test]
    fn unknown_detail_id_is_empty_state() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &detail("nao-existe"));
        assert!(html.contains("Planta não encontrada."));
        assert!(html.contains("← Voltar ao Herbário"));
        assert!(html.contains("class=\"detail-page detail-missing\""));
        // Stylesheet mentions the banner class, markup must not
        assert!(!html.contains("class=\"evidence-banner"));
        assert!(!html.contains("class=\"detail-sheet"));
    }

    #[test]
    fn background_image_or_flat_color() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &Session::new());
        assert!(html.contains("background-image: url(\"data:image/png;base64,"));

        let bare = TempDir::new().unwrap();
        let html = render(bare.path(), &SiteConfig::default(), &Session::new());
        assert!(!html.contains("background-image"));
        assert!(html.contains("background-color: var(--color-bg)"));
        // Still renders every card with placeholders
        assert_eq!(card_count(&html), 14);
    }

    #[test]
    fn sidebar_markdown_and_footer() {
        let tmp = setup_asset_root();
        let html = render(tmp.path(), &SiteConfig::default(), &Session::new());
        assert!(html.contains("<strong>Thiago Abranches</strong>"));
        assert!(html.contains("<h3>Autores do Livro</h3>"));
        assert!(html.contains("Todos os direitos reservados."));
    }

    #[test]
    fn logo_with_link() {
        let tmp = setup_asset_root();
        write_solid_png(&tmp.path().join("logo.png"), 2, 2, [0, 0, 0, 255]);
        let mut config = SiteConfig::default();
        config.site.logo = Some("logo.png".to_string());
        config.site.logo_link = Some("https://www.plantaciencia.com/".to_string());

        let html = render(tmp.path(), &config, &Session::new());
        assert!(html.contains("<a href=\"https://www.plantaciencia.com/\" target=\"_blank\""));
        assert!(html.contains("alt=\"Logo\""));
    }

    #[test]
    fn missing_logo_is_omitted() {
        let tmp = setup_asset_root();
        let mut config = SiteConfig::default();
        config.site.logo = Some("logo.png".to_string());
        let html = render(tmp.path(), &config, &Session::new());
        assert!(!html.contains("alt=\"Logo\""));
    }

    #[test]
    fn user_input_is_escaped() {
        let tmp = setup_asset_root();
        let html = render(
            tmp.path(),
            &SiteConfig::default(),
            &gallery("<b>x</b>", "<script>alert(1)</script>"),
        );
        assert!(html.contains("value=\"&lt;script&gt;alert(1)&lt;/script&gt;\""));
        assert!(html.contains("<strong>&lt;b&gt;x&lt;/b&gt;</strong>"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn configured_columns_reach_css() {
        let tmp = setup_asset_root();
        let mut config = SiteConfig::default();
        config.gallery.columns = 3;
        let html = render(tmp.path(), &config, &Session::new());
        assert!(html.contains("--gallery-columns: 3"));
    }
}
