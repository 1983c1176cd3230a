//! Catalog editing commands: add, import, export
//!
//! These work on a catalog file directly, not on persisted user state.

use crate::config::AppConfig;
use crate::error::{CliError, Result};
use chrono::Utc;
use lectern_library::{Catalog, CatalogDocument, CatalogSource, NewLecture};
use std::path::{Path, PathBuf};
use tracing::info;

/// Append a lecture and write the catalog back
pub async fn add(catalog_path: &Path, new: NewLecture) -> Result<()> {
    let mut catalog = Catalog::read_file(catalog_path).await?;
    let lecture = catalog.add(new, Utc::now())?;
    println!("Added \"{}\" as {} ({})", lecture.title, lecture.id, lecture.filename);

    catalog.write_file(catalog_path).await?;
    info!(path = %catalog_path.display(), lectures = catalog.lectures().len(), "Catalog saved");
    Ok(())
}

/// Merge lectures from another catalog document
pub async fn import(catalog_path: &Path, from: &Path) -> Result<()> {
    let body = tokio::fs::read_to_string(from).await?;
    let document: CatalogDocument = serde_json::from_str(&body)?;

    let mut catalog = Catalog::read_file(catalog_path).await?;
    let summary = catalog.import(document);
    catalog.write_file(catalog_path).await?;

    println!(
        "Imported {} lectures ({} renamed to avoid id collisions)",
        summary.added, summary.renamed
    );
    Ok(())
}

/// Write an export document, or print it when no output path is given
pub async fn export(catalog_path: &Path, output: Option<&Path>) -> Result<()> {
    let catalog = Catalog::read_file(catalog_path).await?;
    let document = catalog.export(Utc::now());
    let json = serde_json::to_string_pretty(&document)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            println!("Exported {} lectures to {}", document.lectures.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Catalog file to edit: the explicit argument, else the configured file source
pub fn resolve_catalog_path(config: &AppConfig, explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    match config.catalog_source() {
        CatalogSource::File(path) => Ok(path),
        other => Err(CliError::BadArgument(format!(
            "catalog source {other} is read-only; pass --catalog <file>"
        ))),
    }
}
