//! Persistence for datasets, metadata and reports.
//!
//! Supports CSV dataset files, pretty-printed JSON, and plain-text reports.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::loader::raw_path;
use crate::models::{Dataset, EvictionRow, RegionCountRow, ShelterRow};
use crate::sample;

/// Subdirectories created under the data root.
pub const DATA_SUBDIRS: [&str; 3] = ["raw", "processed", "metadata"];

/// Creates `raw/`, `processed/` and `metadata/` under `data_dir`.
pub fn create_directories(data_dir: &Path) -> Result<()> {
    for sub in DATA_SUBDIRS {
        let dir = data_dir.join(sub);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    debug!(data_dir = %data_dir.display(), "Data directories ready");
    Ok(())
}

/// Writes `rows` to a CSV file with a header line, replacing any existing file.
pub fn write_records<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "CSV written");
    Ok(())
}

/// Writes the sample rows for `dataset` to `<data_dir>/raw/` and returns the path.
pub fn write_dataset(data_dir: &Path, dataset: Dataset) -> Result<PathBuf> {
    let path = raw_path(data_dir, dataset);
    let count = match dataset {
        Dataset::Shelters => {
            let rows: Vec<ShelterRow> = sample::shelters().iter().map(ShelterRow::from).collect();
            write_records(&path, &rows)?;
            rows.len()
        }
        Dataset::Pit => {
            let rows: Vec<RegionCountRow> =
                sample::regions().iter().map(RegionCountRow::from).collect();
            write_records(&path, &rows)?;
            rows.len()
        }
        Dataset::Evictions => {
            let rows: Vec<EvictionRow> =
                sample::evictions().iter().map(EvictionRow::from).collect();
            write_records(&path, &rows)?;
            rows.len()
        }
    };

    info!(dataset = %dataset, path = %path.display(), records = count, "Dataset saved");
    Ok(path)
}

/// Serializes `value` as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), "JSON written");
    Ok(())
}

pub fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "Text written");
    Ok(())
}
