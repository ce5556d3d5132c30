//! folio: incremental content-build orchestrator.
//!
//! # Usage
//!
//! ```text
//! folio build <src> <dest> [--ignore-times] [--force-copy] [--json]
//! folio watch <src> <dest> [--debounce-ms <ms>] [--watch-url <url>] [--open] [--upload-hook <path>]
//! folio status <src> [--destination <dest>] [--json]
//!
//! global: --verbose | --debug, --log-file <path>   (FOLIO_LOG overrides the filter)
//! ```

mod commands;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{build::BuildArgs, status::StatusArgs, watch::WatchArgs};
use logging::LogArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Build a source tree of pages and documents into a mirrored site",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    log: LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the source tree once.
    Build(BuildArgs),

    /// Build, then rebuild on changes and interactive commands.
    Watch(WatchArgs),

    /// Show what a build would collect from the source tree.
    Status(StatusArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log)?;
    match cli.command {
        Commands::Build(args) => args.run(),
        Commands::Watch(args) => args.run(),
        Commands::Status(args) => args.run(),
    }
}
