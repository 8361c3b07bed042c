use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use csv::Writer;
use tracing::info;

use crate::models::Row;

/// Write flattened rows to one CSV file.
///
/// Odds columns vary per match, so the header is the union of every row's
/// keys (sorted for stable output) and rows leave missing columns blank.
pub fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let header: BTreeSet<&str> = rows
        .iter()
        .flat_map(|row| row.keys().map(String::as_str))
        .collect();

    let mut writer =
        Writer::from_path(path).with_context(|| format!("failed to open {}", path.display()))?;
    if !header.is_empty() {
        writer.write_record(header.iter())?;
        for row in rows {
            writer.write_record(
                header
                    .iter()
                    .map(|key| row.get(*key).map(String::as_str).unwrap_or("")),
            )?;
        }
    }
    writer.flush()?;

    info!(rows = rows.len(), path = %path.display(), "csv written");
    Ok(())
}
