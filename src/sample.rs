//! Demonstration datasets for San Diego shelters, point-in-time counts and
//! evictions, plus the metadata describing where such data comes from.
//!
//! These are explicit fixtures: the `download` command writes them to disk
//! and tests feed them straight into the pipeline.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::models::{Coordinate, Dataset, EvictionRecord, RegionCount, Shelter, ShelterType};

pub fn shelters() -> Vec<Shelter> {
    fn shelter(
        name: &str,
        address: &str,
        location: Coordinate,
        capacity: u32,
        kind: ShelterType,
        phone: &str,
    ) -> Shelter {
        Shelter {
            name: name.to_string(),
            address: address.to_string(),
            location,
            capacity,
            kind,
            phone: phone.to_string(),
        }
    }

    vec![
        shelter(
            "Father Joe's Villages",
            "3350 E St, San Diego, CA 92102",
            Coordinate::new(32.7095, -117.1292),
            350,
            ShelterType::Emergency,
            "(619) 699-1247",
        ),
        shelter(
            "San Diego Rescue Mission",
            "120 Elm St, San Diego, CA 92101",
            Coordinate::new(32.7143, -117.1628),
            200,
            ShelterType::Emergency,
            "(619) 819-1100",
        ),
        shelter(
            "Rachel's Women's Center",
            "3030 K St, San Diego, CA 92102",
            Coordinate::new(32.7072, -117.1351),
            120,
            ShelterType::Womens,
            "(619) 615-0885",
        ),
        shelter(
            "Veterans Village of San Diego",
            "4141 Pacific Hwy, San Diego, CA 92110",
            Coordinate::new(32.7541, -117.2012),
            400,
            ShelterType::Veterans,
            "(858) 453-2400",
        ),
        shelter(
            "Connections Housing Downtown",
            "1250 6th Ave, San Diego, CA 92101",
            Coordinate::new(32.7179, -117.1600),
            150,
            ShelterType::Transitional,
            "(619) 238-2772",
        ),
    ]
}

pub fn regions() -> Vec<RegionCount> {
    // (name, code, unsheltered, sheltered, lat, lon, area)
    let rows = [
        ("Downtown San Diego", "DT", 845, 423, 32.7157, -117.1611, 1.7),
        ("East Village", "EV", 312, 156, 32.7089, -117.1434, 0.8),
        ("North Park", "NP", 178, 89, 32.7427, -117.1294, 2.1),
        ("Pacific Beach", "PB", 156, 34, 32.7942, -117.2324, 2.8),
        ("Midway District", "MD", 234, 167, 32.7533, -117.2069, 3.2),
    ];

    rows.into_iter()
        .map(|(name, code, unsheltered, sheltered, lat, lon, area)| RegionCount {
            region_name: name.to_string(),
            region_code: code.to_string(),
            year: 2024,
            unsheltered_count: unsheltered,
            sheltered_count: sheltered,
            total_count: unsheltered + sheltered,
            location: Coordinate::new(lat, lon),
            area_sq_miles: area,
        })
        .collect()
}

pub fn evictions() -> Vec<EvictionRecord> {
    // (zip, neighborhood, filings, judgments, lat, lon)
    let rows = [
        ("92101", "Downtown", 45, 32, 32.7157, -117.1611),
        ("92102", "Golden Hill", 28, 19, 32.7178, -117.1292),
        ("92103", "Hillcrest", 31, 22, 32.7496, -117.1645),
        ("92104", "North Park", 38, 27, 32.7427, -117.1294),
        ("92109", "Pacific Beach", 24, 15, 32.7942, -117.2324),
    ];

    rows.into_iter()
        .map(|(zip, hood, filings, judgments, lat, lon)| EvictionRecord {
            zip_code: zip.to_string(),
            neighborhood: hood.to_string(),
            year: 2024,
            month: "January".to_string(),
            eviction_filings: filings,
            eviction_judgments: judgments,
            location: Coordinate::new(lat, lon),
        })
        .collect()
}

/// One entry of `metadata/data_sources.json`.
#[derive(Debug, Clone, Serialize)]
pub struct DataSource {
    pub name: &'static str,
    pub source: &'static str,
    pub description: &'static str,
    pub geographic_coverage: &'static str,
    pub includes_coordinates: bool,
    pub file: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub download_date: DateTime<Local>,
    pub data_sources: Vec<DataSource>,
    pub notes: Vec<&'static str>,
}

pub fn data_source(dataset: Dataset) -> DataSource {
    match dataset {
        Dataset::Shelters => DataSource {
            name: "San Diego Shelter Locations",
            source: "San Diego Open Data Portal / Public Records",
            description: "Locations of homeless shelters and service providers in San Diego",
            geographic_coverage: "San Diego County",
            includes_coordinates: true,
            file: dataset.file_name(),
        },
        Dataset::Pit => DataSource {
            name: "Point-in-Time Count Data",
            source: "San Diego Regional Task Force on Homelessness",
            description: "Annual homeless census data by geographic region",
            geographic_coverage: "San Diego County regions",
            includes_coordinates: true,
            file: dataset.file_name(),
        },
        Dataset::Evictions => DataSource {
            name: "Eviction Data",
            source: "San Diego Court Records / Housing Authority",
            description: "Eviction filings and judgments by ZIP code",
            geographic_coverage: "San Diego County ZIP codes",
            includes_coordinates: true,
            file: dataset.file_name(),
        },
    }
}

pub fn metadata(download_date: DateTime<Local>) -> Metadata {
    Metadata {
        download_date,
        data_sources: Dataset::ALL.iter().map(|d| data_source(*d)).collect(),
        notes: vec![
            "All coordinates are in WGS84 (EPSG:4326) format",
            "Data represents sample/demonstration datasets",
            "For production use, connect to live APIs from San Diego Open Data Portal",
            "Some data may be anonymized or aggregated for privacy",
        ],
    }
}
