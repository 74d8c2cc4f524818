//! Typed records for the three datasets and their on-disk CSV row shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// WGS84 latitude/longitude in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components finite and inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Rough bounding box around San Diego County. Soft check only.
    pub fn in_san_diego_area(&self) -> bool {
        (32.5..=33.6).contains(&self.latitude) && (-117.7..=-116.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Shelter category as published in the `type` column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShelterType {
    Emergency,
    Transitional,
    Supportive,
    Womens,
    Veterans,
    Other(String),
}

impl ShelterType {
    pub fn as_str(&self) -> &str {
        match self {
            ShelterType::Emergency => "Emergency Shelter",
            ShelterType::Transitional => "Transitional Housing",
            ShelterType::Supportive => "Supportive Housing",
            ShelterType::Womens => "Women's Shelter",
            ShelterType::Veterans => "Veterans Shelter",
            ShelterType::Other(s) => s,
        }
    }
}

impl From<&str> for ShelterType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "Emergency Shelter" | "Emergency" => ShelterType::Emergency,
            "Transitional Housing" | "Transitional" => ShelterType::Transitional,
            "Supportive Housing" | "Supportive" => ShelterType::Supportive,
            "Women's Shelter" => ShelterType::Womens,
            "Veterans Shelter" => ShelterType::Veterans,
            other => ShelterType::Other(other.to_string()),
        }
    }
}

impl FromStr for ShelterType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ShelterType::from(s))
    }
}

impl fmt::Display for ShelterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Shelter {
    pub name: String,
    pub address: String,
    pub location: Coordinate,
    pub capacity: u32,
    pub kind: ShelterType,
    pub phone: String,
}

/// Point-in-time homeless count for one region.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionCount {
    pub region_name: String,
    pub region_code: String,
    pub year: i32,
    pub unsheltered_count: u32,
    pub sheltered_count: u32,
    pub total_count: u32,
    pub location: Coordinate,
    pub area_sq_miles: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvictionRecord {
    pub zip_code: String,
    pub neighborhood: String,
    pub year: i32,
    pub month: String,
    pub eviction_filings: u32,
    pub eviction_judgments: u32,
    pub location: Coordinate,
}

/// The three published datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Shelters,
    Pit,
    Evictions,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Shelters, Dataset::Pit, Dataset::Evictions];

    /// File name under `raw/`.
    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Shelters => "sd_shelter_locations.csv",
            Dataset::Pit => "sd_pit_count_2024.csv",
            Dataset::Evictions => "sd_eviction_data_2024.csv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Shelters => "shelters",
            Dataset::Pit => "pit",
            Dataset::Evictions => "evictions",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// CSV row shapes. Numeric counts are signed so negative values reach
// validation instead of failing inside the deserializer.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelterRow {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionCountRow {
    pub region_name: String,
    pub region_code: String,
    pub year: i32,
    pub unsheltered_count: i64,
    pub sheltered_count: i64,
    pub total_count: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub area_sq_miles: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvictionRow {
    pub zip_code: String,
    pub neighborhood: String,
    pub year: i32,
    pub month: String,
    pub eviction_filings: i64,
    pub eviction_judgments: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Shelter> for ShelterRow {
    fn from(s: &Shelter) -> Self {
        ShelterRow {
            name: s.name.clone(),
            address: s.address.clone(),
            latitude: s.location.latitude,
            longitude: s.location.longitude,
            capacity: i64::from(s.capacity),
            kind: s.kind.to_string(),
            phone: s.phone.clone(),
        }
    }
}

impl From<&RegionCount> for RegionCountRow {
    fn from(r: &RegionCount) -> Self {
        RegionCountRow {
            region_name: r.region_name.clone(),
            region_code: r.region_code.clone(),
            year: r.year,
            unsheltered_count: i64::from(r.unsheltered_count),
            sheltered_count: i64::from(r.sheltered_count),
            total_count: i64::from(r.total_count),
            latitude: r.location.latitude,
            longitude: r.location.longitude,
            area_sq_miles: r.area_sq_miles,
        }
    }
}

impl From<&EvictionRecord> for EvictionRow {
    fn from(e: &EvictionRecord) -> Self {
        EvictionRow {
            zip_code: e.zip_code.clone(),
            neighborhood: e.neighborhood.clone(),
            year: e.year,
            month: e.month.clone(),
            eviction_filings: i64::from(e.eviction_filings),
            eviction_judgments: i64::from(e.eviction_judgments),
            latitude: e.location.latitude,
            longitude: e.location.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(32.7157, -117.1611).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, f64::INFINITY).is_valid());
    }

    #[test]
    fn test_san_diego_area() {
        assert!(Coordinate::new(32.7157, -117.1611).in_san_diego_area());
        assert!(!Coordinate::new(40.7128, -74.0060).in_san_diego_area());
    }

    #[test]
    fn test_shelter_type_round_trips_through_display() {
        for label in [
            "Emergency Shelter",
            "Transitional Housing",
            "Supportive Housing",
            "Women's Shelter",
            "Veterans Shelter",
        ] {
            let kind: ShelterType = label.parse().unwrap();
            assert!(!matches!(kind, ShelterType::Other(_)));
            assert_eq!(kind.to_string(), label);
        }
    }

    #[test]
    fn test_unknown_shelter_type_is_kept_verbatim() {
        let kind: ShelterType = "Youth Shelter".parse().unwrap();
        assert_eq!(kind, ShelterType::Other("Youth Shelter".to_string()));
        assert_eq!(kind.as_str(), "Youth Shelter");
    }

    #[test]
    fn test_dataset_file_names() {
        assert_eq!(Dataset::Shelters.file_name(), "sd_shelter_locations.csv");
        assert_eq!(Dataset::Pit.file_name(), "sd_pit_count_2024.csv");
        assert_eq!(Dataset::Evictions.file_name(), "sd_eviction_data_2024.csv");
    }
}
