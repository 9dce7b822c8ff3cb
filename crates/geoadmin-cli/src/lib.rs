//! Geoadmin CLI Library
//!
//! Command-line interface for the administrative-geography dataset:
//!
//! - **Dataset Installation**: download and verify the dataset (`geoadmin download`)
//! - **Name Resolution**: exact, exhaustive, and fuzzy lookup (`geoadmin resolve`)
//! - **Status Checking**: show the installed version and files (`geoadmin status`)

pub mod commands;
pub mod logging;
pub mod progress;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Geoadmin - administrative-geography dataset and name resolver
#[derive(Parser, Debug)]
#[command(name = "geoadmin")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Dataset directory (defaults to the user cache directory)
    #[arg(long, env = "GEOADMIN_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download or refresh the dataset
    Download {
        /// Manifest URL describing the latest published dataset
        #[arg(long, default_value = geoadmin::dataset::DEFAULT_SOURCE)]
        source: String,

        /// Fetch a newer version if one is published
        #[arg(short, long)]
        update: bool,
    },

    /// Resolve place names against the installed dataset
    Resolve {
        /// Names to resolve
        #[arg(required = true)]
        names: Vec<String>,

        /// Print every match instead of the first
        #[arg(short, long)]
        all: bool,

        /// Use fuzzy matching
        #[arg(short, long)]
        fuzzy: bool,

        /// Minimum similarity score for fuzzy matches
        #[arg(long, default_value_t = geoadmin::DEFAULT_FUZZY_THRESHOLD)]
        threshold: f32,
    },

    /// Show the installed dataset version and files
    Status,
}

/// Execute the parsed CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Download { source, update } => {
            commands::download::run(cli.data_dir, &source, update).await
        }
        Commands::Resolve {
            names,
            all,
            fuzzy,
            threshold,
        } => commands::resolve::run(cli.data_dir, &names, all, fuzzy, threshold),
        Commands::Status => commands::status::run(cli.data_dir),
    }
}
