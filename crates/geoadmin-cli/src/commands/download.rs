//! `geoadmin download` command implementation
//!
//! Downloads or refreshes the dataset into the target directory.

use crate::progress;
use colored::Colorize;
use geoadmin::dataset::DatasetState;
use geoadmin::GeoData;
use std::path::PathBuf;

/// Download the dataset and report the installed version
pub async fn run(data_dir: Option<PathBuf>, source: &str, update: bool) -> anyhow::Result<()> {
    println!("{} Fetching dataset manifest...", "→".cyan());

    let spinner = progress::create_spinner("Downloading dataset...");
    let geo = GeoData::download(data_dir, source, update).await?;
    spinner.finish_and_clear();

    println!(
        "{} Dataset ready at {}",
        "✓".green(),
        geo.data_path().display()
    );
    if let Some(state) = DatasetState::load(geo.data_path())? {
        println!("  version: {}", state.data.version);
    }

    Ok(())
}
