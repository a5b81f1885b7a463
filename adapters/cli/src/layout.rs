//! Loading of fixture layouts stored as JSON rows of cell codes.

use std::{fs, path::Path};

use anyhow::{Context, Result};

/// Reads a layout such as `[[0, 0, 2], [1, 0, 0]]` from disk.
pub(crate) fn load_layout(path: &Path) -> Result<Vec<Vec<i64>>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout at {}", path.display()))?;
    parse_layout(&contents).with_context(|| format!("failed to parse layout at {}", path.display()))
}

fn parse_layout(contents: &str) -> Result<Vec<Vec<i64>>> {
    serde_json::from_str(contents).context("layout must be a JSON array of integer rows")
}
