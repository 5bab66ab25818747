use clap::{Parser, Subcommand};
use herbario::assets::AssetResolver;
use herbario::catalog::Catalog;
use herbario::config::{self, SiteConfig};
use herbario::extract::{self, PopplerRasterizer};
use herbario::imaging::RustBackend;
use herbario::query::{CategoryFilter, Query};
use herbario::view::{Session, ViewMode};
use herbario::{logging, optimize, output, render, site};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "herbario")]
#[command(about = "Digital herbarium of medicinal plants")]
#[command(long_about = "\
Digital herbarium of medicinal plants

Browse a fixed catalog of plant monographs as a filterable gallery or one
record at a time, rendered to self-contained HTML.

Asset root layout:

  <root>/
  ├── config.toml                  # Optional, see 'herbario gen-config'
  ├── fundo.png                    # Page background (brightened on render)
  ├── livro pm desempenho fisico 2025.pdf   # Source book for 'extract'
  └── imagens_plantas/
      ├── tribulus.png             # <record id>.<png|jpg|jpeg|webp>
      └── maca.jpg

Records without an image render with a placeholder.")]
#[command(version)]
struct Cli {
    /// Asset root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file (default: <root>/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Category and search flags shared by `render` and `list`.
#[derive(clap::Args, Clone)]
struct QueryArgs {
    /// Category option, e.g. "Hormonal" ("Todas" for all)
    #[arg(long)]
    category: Option<String>,

    /// Case-insensitive text matched against name and description
    #[arg(long, default_value = "")]
    search: String,
}

impl QueryArgs {
    fn to_query(&self) -> Query {
        Query::new(
            CategoryFilter::parse(self.category.as_deref().unwrap_or("")),
            self.search.clone(),
        )
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render one page for a session to HTML
    Render {
        /// View to render: gallery or detail
        #[arg(long, default_value = "gallery")]
        view: ViewMode,

        /// Record id for the detail view
        #[arg(long)]
        id: Option<String>,

        #[command(flatten)]
        query: QueryArgs,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Pre-render the gallery, category and detail pages into a directory
    Build {
        /// Output directory
        #[arg(long, default_value = "dist")]
        output: PathBuf,
    },
    /// List catalog records matching a query
    List {
        #[command(flatten)]
        query: QueryArgs,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Rasterize the mapped book pages into the image directory
    Extract {
        /// Source PDF (default: [extract] source_pdf under the root)
        #[arg(long)]
        pdf: Option<PathBuf>,
    },
    /// Shrink and re-encode the image directory as JPEG, in place
    Optimize {
        /// Disable the skip cache and re-encode every image
        #[arg(long)]
        no_cache: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = load_site_config(&cli.root, cli.config.as_deref())?;
    let catalog = Catalog::builtin();

    match cli.command {
        Command::Render {
            view,
            id,
            query,
            out,
        } => {
            let mut session = Session::with_query(query.to_query());
            session.view.navigate(view, id);
            let mut assets = resolver(&cli.root, &site_config);
            let html = render::render_to_string(&site_config, &catalog, &session, &mut assets);
            match out {
                Some(path) => {
                    std::fs::write(&path, html)?;
                    println!("Rendered {} → {}", session.view.mode(), path.display());
                }
                None => print!("{}", html),
            }
        }
        Command::Build { output: out_dir } => {
            let mut assets = resolver(&cli.root, &site_config);
            let report = site::build_site(&site_config, &catalog, &mut assets, &out_dir)?;
            output::print_build_output(&report);
            println!("==> Build complete: {}", out_dir.display());
        }
        Command::List { query, json } => {
            let query = query.to_query();
            let records = query.apply(catalog.records());
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                output::print_list_output(&records, catalog.len(), &query);
            }
        }
        Command::Extract { pdf } => {
            let pdf = pdf.unwrap_or_else(|| cli.root.join(&site_config.extract.source_pdf));
            let out_dir = cli.root.join(&site_config.assets.images_dir);
            let report = extract::extract_pages(
                &PopplerRasterizer::new(),
                &pdf,
                &out_dir,
                &site_config.extract,
            )?;
            output::print_extract_output(&report);
        }
        Command::Optimize { no_cache } => {
            init_thread_pool(&site_config.processing);
            let dir = cli.root.join(&site_config.assets.images_dir);
            let report =
                optimize::optimize_dir(&RustBackend::new(), &dir, &site_config.optimize, !no_cache)?;
            output::print_optimize_output(&report);
        }
        Command::GenConfig => {}
    }

    Ok(())
}

fn load_site_config(
    root: &Path,
    explicit: Option<&Path>,
) -> Result<SiteConfig, config::ConfigError> {
    match explicit {
        Some(path) => config::load_config_file(path),
        None => config::load_config(root),
    }
}

fn resolver(root: &Path, site_config: &SiteConfig) -> AssetResolver {
    AssetResolver::new(root, site_config, Box::new(RustBackend::new()))
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores: user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
