//! pagetoc - table-of-contents extraction for markdown content sites

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser, Subcommand};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use pagetoc::cache::TocCache;
use pagetoc::config::{Config, DEFAULT_CONFIG_FILE};
use pagetoc::content::ContentStore;
use pagetoc::error::PagetocError;
use pagetoc::types::{DocKind, OutputFormat};
use pagetoc::{format, serve, toc};

/// Routes rendered without a content document.
const STATIC_ROUTES: &[&str] = &["", "/projects", "/blog", "/docs"];

#[derive(Parser)]
#[command(name = "pagetoc")]
#[command(version, about = "Table-of-contents extraction for markdown content sites", long_about = None)]
#[command(after_help = "EXAMPLES:
    pagetoc toc docs/intro.mdx --base /docs/intro    Outline with page urls
    pagetoc anchors docs/intro.mdx                   Heading ids as rendered
    pagetoc site --kind doc                          Manifest of all docs")]
struct Cli {
    /// Config file
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the table of contents of a markdown file
    Toc {
        file: PathBuf,
        /// Prefix for every url, e.g. the page path
        #[arg(long, default_value = "")]
        base: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print the id of every heading, as attached by the renderer
    Anchors {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Print a JSON manifest of the published content with outlines
    Site {
        /// Content root (overrides config)
        #[arg(long, value_name = "DIR")]
        content: Option<PathBuf>,
        /// Only this collection
        #[arg(long, value_enum)]
        kind: Option<DocKind>,
    },
    /// Print sitemap entries as JSON
    Sitemap {
        #[arg(long, value_name = "DIR")]
        content: Option<PathBuf>,
    },
    /// Serve JSON-RPC requests on stdin/stdout
    Serve,
    /// Print shell completions
    Completions { shell: clap_complete::Shell },
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("PAGETOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), PagetocError> {
    let config = Config::load(&cli.config)?;

    match cli.command {
        Command::Toc { file, base, format: output } => {
            let raw = read(&file)?;
            let toc = toc::build_with_base(&raw, &base);
            match output {
                OutputFormat::Text => {
                    println!("{}\n", format::file_header(&file, toc.len(), "toc"));
                    print!("{}", format::outline(&toc));
                }
                OutputFormat::Json => print_json(&toc)?,
            }
        }
        Command::Anchors { file, format: output } => {
            let raw = read(&file)?;
            let anchors = toc::heading_anchors(&raw);
            match output {
                OutputFormat::Text => {
                    println!("{}\n", format::file_header(&file, anchors.len(), "anchors"));
                    print!("{}", format::anchors(&anchors));
                }
                OutputFormat::Json => print_json(&anchors)?,
            }
        }
        Command::Site { content, kind } => {
            let root = content.unwrap_or_else(|| config.content_dir.clone());
            let store = ContentStore::load(&root)?;
            let cache = config.toc_cache();
            print_json(&site_manifest(&store, kind, &cache))?;
        }
        Command::Sitemap { content } => {
            let root = content.unwrap_or_else(|| config.content_dir.clone());
            let store = ContentStore::load(&root)?;
            print_json(&sitemap(&store, &config.site_url))?;
        }
        Command::Serve => {
            let cache = config.toc_cache();
            serve::run(&cache).map_err(|e| PagetocError::io("<stdio>", e))?;
        }
        Command::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pagetoc", &mut io::stdout());
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, PagetocError> {
    fs::read_to_string(path).map_err(|e| PagetocError::io(path, e))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), PagetocError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| PagetocError::InvalidRequest {
        reason: e.to_string(),
    })?;
    println!("{text}");
    Ok(())
}

fn site_manifest(store: &ContentStore, only: Option<DocKind>, cache: &TocCache) -> Value {
    let kinds: Vec<DocKind> = match only {
        Some(kind) => vec![kind],
        None => DocKind::ALL.to_vec(),
    };
    let docs: Vec<Value> = kinds
        .into_iter()
        .flat_map(|kind| store.list(kind))
        .map(|doc| {
            json!({
                "kind": doc.kind,
                "url": doc.url,
                "title": doc.meta.title,
                "description": doc.meta.description,
                "date": doc.meta.date,
                "toc": &*doc.toc(cache),
            })
        })
        .collect();
    json!({ "documents": docs })
}

fn sitemap(store: &ContentStore, site_url: &str) -> Vec<Value> {
    let site_url = site_url.trim_end_matches('/');
    let statics = STATIC_ROUTES
        .iter()
        .map(|route| json!({ "url": format!("{site_url}{route}") }));
    let posts = store.list(DocKind::Post).into_iter().map(|post| {
        json!({
            "url": format!("{site_url}{}", post.url),
            "lastModified": post.meta.date,
        })
    });
    statics.chain(posts).collect()
}
