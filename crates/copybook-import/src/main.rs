//! CLI for the copybook flat-file import engine.
//!
//! Reads a YAML manifest of import jobs, decodes fixed-width legacy
//! files with declarative layouts, and emits the parsed records as
//! JSON lines.
//!
//! # Examples
//!
//! ```bash
//! # Validate a manifest and every referenced layout
//! copybook-import check manifest.yaml
//!
//! # Run all jobs, one output file per job
//! copybook-import run manifest.yaml --out imported/
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;

mod commands;
mod entities;
mod logging;
mod runner;
mod sink;

#[derive(Parser, Debug)]
#[command(name = "copybook-import")]
#[command(version, about = "Copybook-driven flat file import engine", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format: text or json
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a manifest, its layouts, and their entity wiring
    Check {
        /// Manifest file to validate
        manifest: PathBuf,
    },
    /// Run every job in a manifest
    Run {
        /// Manifest file to execute
        manifest: PathBuf,

        /// Directory receiving one JSON-lines file per job; stdout if absent
        #[arg(long)]
        out: Option<PathBuf>,

        /// Parsed records buffered per sink flush
        #[arg(long, default_value_t = 500)]
        batch_size: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, &cli.log_format)?;

    match cli.command {
        Commands::Check { manifest } => commands::check(&manifest),
        Commands::Run {
            manifest,
            out,
            batch_size,
        } => commands::run(&manifest, out.as_deref(), batch_size),
    }
}
