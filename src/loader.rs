//! CSV loading and validation for the three datasets.
//!
//! Every row is checked here so the distance and aggregation code can assume
//! well-formed input: finite in-range coordinates, non-negative counts,
//! `total_count == unsheltered + sheltered`, positive area, and judgments
//! never exceeding filings.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::models::{
    Coordinate, Dataset, EvictionRecord, EvictionRow, RegionCount, RegionCountRow, Shelter,
    ShelterRow, ShelterType,
};

/// All three datasets loaded from one data directory.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub shelters: Vec<Shelter>,
    pub regions: Vec<RegionCount>,
    pub evictions: Vec<EvictionRecord>,
}

/// Path of a dataset's CSV under `<data_dir>/raw/`.
pub fn raw_path(data_dir: &Path, dataset: Dataset) -> std::path::PathBuf {
    data_dir.join("raw").join(dataset.file_name())
}

/// Loads and validates every dataset under `data_dir`.
pub fn load_all(data_dir: &Path) -> Result<Datasets> {
    let datasets = Datasets {
        shelters: load_shelters(&raw_path(data_dir, Dataset::Shelters))?,
        regions: load_regions(&raw_path(data_dir, Dataset::Pit))?,
        evictions: load_evictions(&raw_path(data_dir, Dataset::Evictions))?,
    };
    info!(
        shelters = datasets.shelters.len(),
        regions = datasets.regions.len(),
        evictions = datasets.evictions.len(),
        "Datasets loaded"
    );
    Ok(datasets)
}

pub fn load_shelters(path: &Path) -> Result<Vec<Shelter>> {
    let file = open(path)?;
    parse_shelters(file).with_context(|| format!("loading {}", path.display()))
}

pub fn load_regions(path: &Path) -> Result<Vec<RegionCount>> {
    let file = open(path)?;
    parse_regions(file).with_context(|| format!("loading {}", path.display()))
}

pub fn load_evictions(path: &Path) -> Result<Vec<EvictionRecord>> {
    let file = open(path)?;
    parse_evictions(file).with_context(|| format!("loading {}", path.display()))
}

fn open(path: &Path) -> Result<File> {
    debug!(path = %path.display(), "Opening CSV");
    File::open(path).with_context(|| format!("data file not found: {}", path.display()))
}

/// Parses shelter rows from CSV text.
pub fn parse_shelters<R: Read>(reader: R) -> crate::error::Result<Vec<Shelter>> {
    let rows: Vec<ShelterRow> = read_rows(reader, Dataset::Shelters)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| validate_shelter(row, i + 1))
        .collect()
}

/// Parses point-in-time count rows from CSV text.
pub fn parse_regions<R: Read>(reader: R) -> crate::error::Result<Vec<RegionCount>> {
    let rows: Vec<RegionCountRow> = read_rows(reader, Dataset::Pit)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| validate_region(row, i + 1))
        .collect()
}

/// Parses eviction rows from CSV text.
pub fn parse_evictions<R: Read>(reader: R) -> crate::error::Result<Vec<EvictionRecord>> {
    let rows: Vec<EvictionRow> = read_rows(reader, Dataset::Evictions)?;
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| validate_eviction(row, i + 1))
        .collect()
}

fn read_rows<R: Read, T: DeserializeOwned>(
    reader: R,
    dataset: Dataset,
) -> crate::error::Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        let row: T = result
            .map_err(|e| DataError::validation(dataset.label(), i + 1, e.to_string()))?;
        rows.push(row);
    }

    debug!(dataset = %dataset, rows = rows.len(), "CSV rows read");
    Ok(rows)
}

fn coordinate(
    dataset: Dataset,
    row: usize,
    latitude: f64,
    longitude: f64,
) -> crate::error::Result<Coordinate> {
    let c = Coordinate::new(latitude, longitude);
    if !c.is_valid() {
        return Err(DataError::validation(
            dataset.label(),
            row,
            format!("coordinate out of range: ({latitude}, {longitude})"),
        ));
    }
    if !c.in_san_diego_area() {
        warn!(
            dataset = %dataset,
            row,
            latitude,
            longitude,
            "Coordinate outside San Diego area"
        );
    }
    Ok(c)
}

fn count(dataset: Dataset, row: usize, field: &str, value: i64) -> crate::error::Result<u32> {
    if value < 0 {
        return Err(DataError::validation(
            dataset.label(),
            row,
            format!("{field} must be non-negative, got {value}"),
        ));
    }
    u32::try_from(value).map_err(|_| {
        DataError::validation(
            dataset.label(),
            row,
            format!("{field} exceeds {}, got {value}", u32::MAX),
        )
    })
}

fn required(dataset: Dataset, row: usize, field: &str, value: &str) -> crate::error::Result<()> {
    if value.trim().is_empty() {
        return Err(DataError::validation(
            dataset.label(),
            row,
            format!("{field} is empty"),
        ));
    }
    Ok(())
}

fn validate_shelter(row: ShelterRow, n: usize) -> crate::error::Result<Shelter> {
    let ds = Dataset::Shelters;
    required(ds, n, "name", &row.name)?;
    let location = coordinate(ds, n, row.latitude, row.longitude)?;
    let capacity = count(ds, n, "capacity", row.capacity)?;

    Ok(Shelter {
        name: row.name,
        address: row.address,
        location,
        capacity,
        kind: ShelterType::from(row.kind.as_str()),
        phone: row.phone,
    })
}

fn validate_region(row: RegionCountRow, n: usize) -> crate::error::Result<RegionCount> {
    let ds = Dataset::Pit;
    required(ds, n, "region_name", &row.region_name)?;
    let location = coordinate(ds, n, row.latitude, row.longitude)?;
    let unsheltered_count = count(ds, n, "unsheltered_count", row.unsheltered_count)?;
    let sheltered_count = count(ds, n, "sheltered_count", row.sheltered_count)?;
    let total_count = count(ds, n, "total_count", row.total_count)?;

    if u64::from(total_count) != u64::from(unsheltered_count) + u64::from(sheltered_count) {
        return Err(DataError::validation(
            ds.label(),
            n,
            format!(
                "total_count {total_count} != unsheltered {unsheltered_count} \
                 + sheltered {sheltered_count}"
            ),
        ));
    }
    if !(row.area_sq_miles.is_finite() && row.area_sq_miles > 0.0) {
        return Err(DataError::validation(
            ds.label(),
            n,
            format!("area_sq_miles must be positive, got {}", row.area_sq_miles),
        ));
    }

    Ok(RegionCount {
        region_name: row.region_name,
        region_code: row.region_code,
        year: row.year,
        unsheltered_count,
        sheltered_count,
        total_count,
        location,
        area_sq_miles: row.area_sq_miles,
    })
}

fn validate_eviction(row: EvictionRow, n: usize) -> crate::error::Result<EvictionRecord> {
    let ds = Dataset::Evictions;
    if row.zip_code.len() != 5 || !row.zip_code.chars().all(|c| c.is_ascii_digit()) {
        return Err(DataError::validation(
            ds.label(),
            n,
            format!("zip_code must be 5 digits, got {:?}", row.zip_code),
        ));
    }
    let location = coordinate(ds, n, row.latitude, row.longitude)?;
    let eviction_filings = count(ds, n, "eviction_filings", row.eviction_filings)?;
    let eviction_judgments = count(ds, n, "eviction_judgments", row.eviction_judgments)?;

    if eviction_judgments > eviction_filings {
        return Err(DataError::validation(
            ds.label(),
            n,
            format!(
                "eviction_judgments {eviction_judgments} exceed \
                 eviction_filings {eviction_filings}"
            ),
        ));
    }

    Ok(EvictionRecord {
        zip_code: row.zip_code,
        neighborhood: row.neighborhood,
        year: row.year,
        month: row.month,
        eviction_filings,
        eviction_judgments,
        location,
    })
}
