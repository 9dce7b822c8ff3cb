//! `geoadmin status` command implementation
//!
//! Shows the installed dataset version and the state of its files.

use crate::progress;
use colored::Colorize;
use geoadmin::dataset::{self, DatasetState, DB_FILENAME, INDEX_FILENAME};
use std::path::PathBuf;

/// Print the installed dataset version and file sizes
pub fn run(data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => dataset::default_data_dir()?,
    };

    let Some(state) = DatasetState::load(&dir)? else {
        println!(
            "No dataset installed at {} (run 'geoadmin download')",
            dir.display()
        );
        return Ok(());
    };

    println!("{} Dataset at {}", "✓".green(), dir.display());
    println!("  version: {}", state.data.version);
    for name in [DB_FILENAME, INDEX_FILENAME] {
        match std::fs::metadata(dir.join(name)) {
            Ok(meta) => println!("  {:<20} {}", name, progress::format_bytes(meta.len())),
            Err(_) => println!("  {:<20} {}", name, "missing".red()),
        }
    }

    Ok(())
}
