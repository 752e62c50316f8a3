mod attribution;
mod catalog;
mod cli;
mod config;
mod utils;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use cli::{attribute::attribute_cmd, list::list_cmd, ColorMode};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the `tracing` filter directives
const LOG_ENV_VAR: &str = "MODELCAT_LOG";

#[derive(Default, Clone, Copy, ValueEnum, strum_macros::Display, strum_macros::EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum RequestedColorMode {
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Parser)]
#[command(name = "modelcat")]
#[command(
    about = "Catalog AI models across providers and attribute them to their authors",
    version = "0.0.1"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(long, default_value_t = RequestedColorMode::default())]
    color: RequestedColorMode,
    /// Read the catalog from the specified file instead of the configured one
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Read the configuration from the specified file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries
    List(ListArgs),
    /// Show the authors of one or more models
    Attribute(AttributeArgs),
}

/// Possible listings
#[derive(Subcommand)]
pub(crate) enum ListObject {
    /// Models served by the providers in the catalog
    Models(ListModelArgs),
    /// Providers
    Providers,
    /// Model authors
    Authors,
}

/// Output formats
#[derive(
    ValueEnum,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ListingFormat {
    /// Format the output as a table
    #[default]
    Table,
    /// Format the output as JSON
    Json,
    /// Format the output as a table without a header
    HeaderlessTable,
}

#[derive(Parser)]
pub(crate) struct ListArgs {
    /// Output the listing with the specified format
    #[arg(short, long)]
    format: Option<ListingFormat>,
    /// List the specified object
    #[command(subcommand)]
    object: ListObject,
}

#[derive(Parser, Default)]
pub(crate) struct ListModelArgs {
    /// Limit listing to the specified provider
    #[arg(short, long)]
    provider: Option<String>,
    /// Limit listing to models created by the specified author
    #[arg(short, long)]
    author: Option<String>,
}

#[derive(Parser)]
pub(crate) struct AttributeArgs {
    /// Output the attributions with the specified format
    #[arg(short, long)]
    format: Option<ListingFormat>,
    /// The model identifiers to attribute
    #[arg(required = true)]
    models: Vec<String>,
}

fn init_tracing(color: ColorMode) {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(color == ColorMode::On)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();

    let color = ColorMode::resolve_auto(cli.color);
    utils::errors::configure_color(color);

    init_tracing(color);

    let config = match config::read_config(cli.config.clone()) {
        Ok(config) => config,
        Err(err) => die!("{}", err),
    };

    let catalog_path = cli.catalog.clone().or_else(|| config.catalog.clone());

    match &cli.command {
        Commands::List(args) => list_cmd(color, &config, catalog_path.as_deref(), args),
        Commands::Attribute(args) => attribute_cmd(color, &config, catalog_path.as_deref(), args),
    }
}
