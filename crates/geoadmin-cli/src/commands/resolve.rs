//! `geoadmin resolve` command implementation
//!
//! Resolves place names against the installed dataset. A name with no
//! match is reported but is not an error; the command only fails when the
//! dataset itself is missing or unreadable.

use colored::Colorize;
use geoadmin::{Area, GeoData};
use std::path::PathBuf;

/// Resolve each name and print the matches
pub fn run(
    data_dir: Option<PathBuf>,
    names: &[String],
    all: bool,
    fuzzy: bool,
    threshold: f32,
) -> anyhow::Result<()> {
    let geo = match data_dir {
        Some(dir) => GeoData::open(dir)?,
        None => GeoData::from_default_dir()?,
    };

    for name in names {
        if fuzzy {
            let matches = geo.resolve_name_fuzzy(name, threshold)?;
            if matches.is_empty() {
                println!("{} {}: no match", "✗".red(), name);
                continue;
            }
            println!("{} {}:", "✓".green(), name);
            for (score, area) in &matches {
                println!("  {score:.3}  {}", describe(area)?);
            }
        } else if all {
            let matches = geo
                .resolve_name_all(name)?
                .collect::<geoadmin::Result<Vec<_>>>()?;
            if matches.is_empty() {
                println!("{} {}: no match", "✗".red(), name);
                continue;
            }
            println!("{} {}:", "✓".green(), name);
            for area in &matches {
                println!("  {}", describe(area)?);
            }
        } else {
            match geo.resolve_name(name)? {
                Some(area) => println!("{} {}: {}", "✓".green(), name, describe(&area)?),
                None => println!("{} {}: no match", "✗".red(), name),
            }
        }
    }

    Ok(())
}

/// One-line description: name, id, level, and the ancestor chain
fn describe(area: &Area<'_>) -> geoadmin::Result<String> {
    let mut label = format!("{} [{}] level={}", area.name(), area.id(), area.level());

    let mut ancestry = Vec::new();
    let mut cursor = area.parent_area(None)?;
    while let Some(parent) = cursor {
        ancestry.push(parent.name().to_string());
        cursor = parent.parent_area(None)?;
    }
    if !ancestry.is_empty() {
        label.push_str(&format!(" ({})", ancestry.join(", ")));
    }

    Ok(label)
}
