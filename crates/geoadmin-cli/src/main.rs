//! Geoadmin CLI - Main entry point

use clap::Parser;
use geoadmin_cli::{logging, Cli};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    if let Err(e) = geoadmin_cli::run(cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
