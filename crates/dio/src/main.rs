//! dio CLI - drawio diagram embedding for documentation builds.
//!
//! Provides commands for:
//! - `process`: rewrite diagram references in a rendered site and install assets
//! - `tag`: apply the Markdown lightbox pre-pass to a docs source tree

mod commands;
mod config;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ProcessArgs, TagArgs};
use output::Output;

/// dio - drawio diagram embedding.
#[derive(Parser)]
#[command(name = "dio", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite diagram references in a rendered site directory.
    Process(ProcessArgs),
    /// Tag diagram images in Markdown sources for lightbox exclusion.
    Tag(TagArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = match &cli.command {
        Commands::Process(args) => args.verbose,
        Commands::Tag(args) => args.verbose,
    };

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Process(args) => args.execute(&output),
        Commands::Tag(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
