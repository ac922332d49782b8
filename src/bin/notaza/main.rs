//! notaza CLI tool
//!
//! Command-line interface for maintaining a notebook directory with notaza.
//!
//! ## Commands
//!
//! - `refresh [dir]`: rebuild every page's backlinks region
//! - `check [dir]`: report pages whose outline does not parse
//! - `show <page> [dir]`: print one page's outline and the pages that link to it
//!
//! Settings come from `notaza.toml` (see `--config`); command line arguments override them.
//!
//! **Warning**: `refresh` modifies files in place unless `--dry-run` is given or the config sets
//! `write = false`.

use clap::{Parser, Subcommand};
use notaza::{
    backlinks::BacklinkIndex,
    config::{NotazaConfig, CONFIG_FILE_NAME},
    properties::PageId,
    refresh::{load_all, load_page, read_pages, refresh_backlinks_with, RefreshOptions},
    store::FsPageStore,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notaza")]
#[command(author, version, about = "Outline notebook maintenance: backlinks and page checks", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the backlinks region of every page
    Refresh {
        /// Pages directory (default: `pages_dir` from the config)
        dir: Option<PathBuf>,

        /// Report which pages would change without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// Parse every page and list the malformed ones
    Check {
        /// Pages directory (default: `pages_dir` from the config)
        dir: Option<PathBuf>,
    },

    /// Print a page's outline with block depths, and its backlinks
    Show {
        /// Page id, e.g. `inbox` or `projects/garden`
        page: String,

        /// Pages directory (default: `pages_dir` from the config)
        dir: Option<PathBuf>,

        /// Print the parsed page as JSON instead
        #[arg(long)]
        json: bool,
    },
}

fn store_for(config: &NotazaConfig, dir: Option<PathBuf>) -> FsPageStore {
    let mut config = config.clone();
    if let Some(dir) = dir {
        config.pages_dir = dir;
    }
    FsPageStore::from_config(&config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = NotazaConfig::load(&cli.config)?;

    match cli.command {
        Commands::Refresh { dir, dry_run } => {
            let store = store_for(&config, dir);
            let options = RefreshOptions {
                write: config.write && !dry_run,
            };
            let report = refresh_backlinks_with(&store, options)?;
            print!("{report}");
            Ok(())
        }

        Commands::Check { dir } => {
            let store = store_for(&config, dir);
            let (pages, unreadable) = read_pages(&store)?;
            for (id, err) in unreadable.iter() {
                println!("{id}: {err}");
            }
            let malformed: Vec<_> = pages.iter().filter(|p| p.is_malformed()).collect();
            for page in malformed.iter() {
                if let Some(err) = &page.parse_error {
                    println!("{}: {err}", page.id);
                }
            }
            println!(
                "checked {} page(s), {} malformed, {} unreadable",
                pages.len() + unreadable.len(),
                malformed.len(),
                unreadable.len()
            );
            if !malformed.is_empty() || !unreadable.is_empty() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Show { page, dir, json } => {
            let store = store_for(&config, dir);
            let id = PageId::from(page);
            let page = load_page(&store, &id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&page)?);
                return Ok(());
            }
            println!("# {} ({})", page.title, page.id);
            if let Some(err) = &page.parse_error {
                println!("! {err}");
            }
            for (block, depth) in page.body.descendants() {
                let indent = "  ".repeat(depth - 1);
                let mut lines = block.content.lines();
                println!("{indent}[{depth}] {}", lines.next().unwrap_or(""));
                for line in lines {
                    println!("{indent}    {line}");
                }
            }

            let index = BacklinkIndex::build(&load_all(&store)?);
            let groups = index.groups(&id);
            println!();
            if groups.is_empty() {
                println!("No backlinks");
            }
            for group in groups.iter() {
                println!(
                    "<- {} ({}): {} reference(s)",
                    group.title,
                    group.source,
                    group.contexts.len()
                );
                for context in group.contexts.iter() {
                    println!("     {}", context.content.lines().next().unwrap_or(""));
                }
            }
            Ok(())
        }
    }
}
