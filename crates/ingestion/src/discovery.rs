//! Input file discovery.

use std::path::{Path, PathBuf};
use tracing::{info, warn};
use volscope_core::{Error, Result};

/// List the `*.csv` files in a data directory, sorted by path.
///
/// A missing directory is a configuration error. An existing directory with
/// no CSV files yields an empty list.
pub fn discover_inputs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::config(format!(
            "data directory '{}' does not exist",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        warn!("No CSV files found in {}", dir.display());
    } else {
        info!("Found {} CSV files in {}", files.len(), dir.display());
    }

    Ok(files)
}

/// Asset name for a file: its stem (`Bitcoin.csv` -> `Bitcoin`).
pub fn asset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.split('.').next().unwrap_or(s).to_string())
        .unwrap_or_else(|| path.display().to_string())
}
