//! Node Palette - command line front end
//!
//! Prints the node catalog and encodes drag payloads, for checking a registry
//! and subgraph folder without starting the editor.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use node_palette::catalog::{CatalogTree, FsIconSource, ItemRegistry, DRAG_MIME_TYPE};
use node_palette::PaletteConfig;

/// Inspect the node catalog
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Palette configuration file (JSON); defaults apply when missing
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the category tree
    Tree {
        /// Node registry (JSON array of item descriptors)
        #[arg(short = 'r', long = "registry", value_name = "FILE")]
        registry: PathBuf,
    },
    /// Encode the drag payload of one catalog item
    Drag {
        /// Node registry (JSON array of item descriptors)
        #[arg(short = 'r', long = "registry", value_name = "FILE")]
        registry: PathBuf,

        /// Item name as shown in the catalog
        #[arg(short = 'i', long = "item", value_name = "NAME")]
        item: String,

        /// Category path of the item; searched when omitted
        #[arg(long = "category", value_name = "PATH")]
        category: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PaletteConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PaletteConfig::default(),
    };

    match args.command {
        Command::Tree { registry } => print_tree(&registry, &config),
        Command::Drag {
            registry,
            item,
            category,
        } => print_drag(&registry, &item, category, &config),
    }
}

fn load_catalog(registry: &Path, config: &PaletteConfig) -> Result<CatalogTree> {
    let registry = ItemRegistry::load_from_file(registry)
        .with_context(|| format!("loading registry {}", registry.display()))?;
    let catalog = CatalogTree::refresh(&registry, config);
    info!("Catalog holds {} item(s)", catalog.root().item_count());
    Ok(catalog)
}

fn print_tree(registry: &Path, config: &PaletteConfig) -> Result<()> {
    let catalog = load_catalog(registry, config)?;
    catalog.root().walk(&mut |depth, node| {
        let indent = "  ".repeat(depth);
        println!("{indent}{}", node.display_label());
        for item in &node.items {
            println!("{indent}  - {} [{}]", item.name, item.kind_id);
        }
    });
    Ok(())
}

fn print_drag(
    registry: &Path,
    item: &str,
    category: Option<String>,
    config: &PaletteConfig,
) -> Result<()> {
    let catalog = load_catalog(registry, config)?;
    let category = match category {
        Some(category) => category,
        None => catalog
            .root()
            .locate(item)
            .map(|(path, _)| path)
            .ok_or_else(|| anyhow!("no catalog item named '{item}'"))?,
    };

    let icons = FsIconSource::new(config.icon_root.clone());
    let payload = catalog
        .drag_payload_for(&category, item, &icons)
        .ok_or_else(|| anyhow!("no item '{item}' in category '{category}'"))?;
    let bytes = payload.to_bytes().context("encoding drag payload")?;

    println!("mime:    {DRAG_MIME_TYPE}");
    println!("kind:    {}", payload.kind_id);
    println!("name:    {}", payload.display_name);
    if let Some(file) = &payload.associated_file {
        println!("file:    {file}");
    }
    match &payload.preview_image {
        Some(preview) => println!("preview: {} bytes", preview.len()),
        None => println!("preview: none"),
    }
    println!("payload: {} bytes", bytes.len());
    Ok(())
}
