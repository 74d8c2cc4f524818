//! Turns loaded datasets into an [`AnalysisReport`].
//!
//! Nothing here touches the file system or formats text; rendering lives in
//! [`crate::report`] and persistence in [`crate::output`].

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::{debug, warn};

use crate::aggregate::{density, group_by, mean, median, rate, total, utilization};
use crate::geo::{DistanceUnit, nearest_in};
use crate::loader::Datasets;
use crate::models::{EvictionRecord, RegionCount, Shelter};

/// Shelter capacity against the counted population.
#[derive(Debug, Clone, Serialize)]
pub struct CapacitySummary {
    pub total_capacity: u64,
    pub total_homeless: u64,
    pub sheltered: u64,
    pub unsheltered: u64,
    /// Sheltered people per bed.
    pub utilization: Option<f64>,
    /// People counted minus beds available. Negative when beds exceed need.
    pub capacity_gap: i64,
    /// Gap as a share of the counted population.
    pub gap_share: Option<f64>,
    pub by_type: Vec<TypeCapacity>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeCapacity {
    pub kind: String,
    pub capacity: u64,
    pub share: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionSummary {
    pub region_name: String,
    pub region_code: String,
    pub total_count: u32,
    pub unsheltered_count: u32,
    pub unsheltered_rate: Option<f64>,
    /// People per square mile.
    pub density: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeographicSummary {
    /// Ordered by total count, largest first.
    pub regions: Vec<RegionSummary>,
    pub total_count: u64,
    pub unsheltered_count: u64,
    /// Region codes ordered by density, densest first.
    pub need_ranking: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NeighborhoodEvictions {
    pub neighborhood: String,
    pub zip_code: String,
    pub filings: u32,
    pub judgments: u32,
    pub judgment_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvictionSummary {
    pub total_filings: u64,
    pub total_judgments: u64,
    pub judgment_rate: Option<f64>,
    /// Ordered by filings, largest first.
    pub neighborhoods: Vec<NeighborhoodEvictions>,
}

/// Closest shelter to a region's reference point.
#[derive(Debug, Clone, Serialize)]
pub struct NearestShelter {
    pub region_name: String,
    pub shelter_name: Option<String>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetStatistics {
    pub shelter_count: usize,
    pub mean_capacity: f64,
    pub median_capacity: f64,
    /// Max minus min shelter latitude, in degrees.
    pub latitude_spread: f64,
    pub region_count: usize,
    pub sheltered_share: Option<f64>,
    pub unsheltered_share: Option<f64>,
    pub mean_per_region: f64,
    pub eviction_zip_count: usize,
    pub mean_filings_per_zip: f64,
    pub judgment_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub generated_at: DateTime<Local>,
    pub distance_unit: &'static str,
    pub capacity: CapacitySummary,
    pub geography: GeographicSummary,
    pub evictions: EvictionSummary,
    pub nearest_shelters: Vec<NearestShelter>,
    pub statistics: DatasetStatistics,
}

impl AnalysisReport {
    pub fn build(data: &Datasets, unit: DistanceUnit) -> Self {
        debug!(
            shelters = data.shelters.len(),
            regions = data.regions.len(),
            evictions = data.evictions.len(),
            "Building analysis report"
        );

        AnalysisReport {
            generated_at: Local::now(),
            distance_unit: unit.suffix(),
            capacity: capacity_summary(&data.shelters, &data.regions),
            geography: geographic_summary(&data.regions),
            evictions: eviction_summary(&data.evictions),
            nearest_shelters: nearest_shelters(&data.regions, &data.shelters, unit),
            statistics: dataset_statistics(data),
        }
    }
}

pub fn capacity_summary(shelters: &[Shelter], regions: &[RegionCount]) -> CapacitySummary {
    let total_capacity = total(shelters, |s| u64::from(s.capacity));
    let total_homeless = total(regions, |r| u64::from(r.total_count));
    let sheltered = total(regions, |r| u64::from(r.sheltered_count));
    let unsheltered = total(regions, |r| u64::from(r.unsheltered_count));
    let capacity_gap = total_homeless as i64 - total_capacity as i64;

    let mut by_type: Vec<TypeCapacity> = group_by(shelters, |s| s.kind.clone())
        .into_iter()
        .map(|(kind, members)| {
            let capacity = members.iter().map(|s| u64::from(s.capacity)).sum::<u64>();
            TypeCapacity {
                kind: kind.to_string(),
                capacity,
                share: rate(capacity as f64, total_capacity as f64),
            }
        })
        .collect();
    by_type.sort_by(|a, b| b.capacity.cmp(&a.capacity));

    CapacitySummary {
        total_capacity,
        total_homeless,
        sheltered,
        unsheltered,
        utilization: utilization(total_capacity, sheltered),
        capacity_gap,
        gap_share: rate(capacity_gap as f64, total_homeless as f64),
        by_type,
    }
}

pub fn geographic_summary(regions: &[RegionCount]) -> GeographicSummary {
    let mut rows: Vec<RegionSummary> = regions
        .iter()
        .map(|r| RegionSummary {
            region_name: r.region_name.clone(),
            region_code: r.region_code.clone(),
            total_count: r.total_count,
            unsheltered_count: r.unsheltered_count,
            unsheltered_rate: rate(f64::from(r.unsheltered_count), f64::from(r.total_count)),
            density: density(r),
        })
        .collect();
    rows.sort_by(|a, b| b.total_count.cmp(&a.total_count));

    GeographicSummary {
        regions: rows,
        total_count: total(regions, |r| u64::from(r.total_count)),
        unsheltered_count: total(regions, |r| u64::from(r.unsheltered_count)),
        need_ranking: rank_by_density(regions)
            .into_iter()
            .map(|(r, _)| r.region_code.clone())
            .collect(),
    }
}

/// Regions paired with their density, densest first. Ties keep input order.
pub fn rank_by_density(regions: &[RegionCount]) -> Vec<(&RegionCount, f64)> {
    let mut ranked: Vec<(&RegionCount, f64)> = regions.iter().map(|r| (r, density(r))).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked
}

pub fn eviction_summary(evictions: &[EvictionRecord]) -> EvictionSummary {
    let total_filings = total(evictions, |e| u64::from(e.eviction_filings));
    let total_judgments = total(evictions, |e| u64::from(e.eviction_judgments));

    let mut neighborhoods: Vec<NeighborhoodEvictions> = evictions
        .iter()
        .map(|e| NeighborhoodEvictions {
            neighborhood: e.neighborhood.clone(),
            zip_code: e.zip_code.clone(),
            filings: e.eviction_filings,
            judgments: e.eviction_judgments,
            judgment_rate: rate(f64::from(e.eviction_judgments), f64::from(e.eviction_filings)),
        })
        .collect();
    neighborhoods.sort_by(|a, b| b.filings.cmp(&a.filings));

    EvictionSummary {
        total_filings,
        total_judgments,
        judgment_rate: rate(total_judgments as f64, total_filings as f64),
        neighborhoods,
    }
}

/// Nearest shelter for every region. With no shelters loaded each entry is
/// left empty instead of failing the whole report.
pub fn nearest_shelters(
    regions: &[RegionCount],
    shelters: &[Shelter],
    unit: DistanceUnit,
) -> Vec<NearestShelter> {
    regions
        .iter()
        .map(|region| {
            let candidates = shelters.iter().map(|s| (s.name.as_str(), s.location));
            match nearest_in(region.location, candidates, unit) {
                Ok(found) => NearestShelter {
                    region_name: region.region_name.clone(),
                    shelter_name: Some(found.id.to_string()),
                    distance: Some(found.distance),
                },
                Err(e) => {
                    warn!(region = %region.region_name, error = %e, "No nearest shelter");
                    NearestShelter {
                        region_name: region.region_name.clone(),
                        shelter_name: None,
                        distance: None,
                    }
                }
            }
        })
        .collect()
}

pub fn dataset_statistics(data: &Datasets) -> DatasetStatistics {
    let capacities: Vec<f64> = data.shelters.iter().map(|s| f64::from(s.capacity)).collect();
    let latitudes = data.shelters.iter().map(|s| s.location.latitude);
    let latitude_spread = match (
        latitudes.clone().reduce(f64::max),
        latitudes.reduce(f64::min),
    ) {
        (Some(max), Some(min)) => max - min,
        _ => 0.0,
    };

    let region_totals: Vec<f64> = data.regions.iter().map(|r| f64::from(r.total_count)).collect();
    let total_homeless = total(&data.regions, |r| u64::from(r.total_count)) as f64;
    let sheltered = total(&data.regions, |r| u64::from(r.sheltered_count)) as f64;
    let unsheltered = total(&data.regions, |r| u64::from(r.unsheltered_count)) as f64;

    let filings: Vec<f64> = data
        .evictions
        .iter()
        .map(|e| f64::from(e.eviction_filings))
        .collect();
    let judgments = total(&data.evictions, |e| u64::from(e.eviction_judgments)) as f64;

    DatasetStatistics {
        shelter_count: data.shelters.len(),
        mean_capacity: mean(&capacities),
        median_capacity: median(&capacities),
        latitude_spread,
        region_count: data.regions.len(),
        sheltered_share: rate(sheltered, total_homeless),
        unsheltered_share: rate(unsheltered, total_homeless),
        mean_per_region: mean(&region_totals),
        eviction_zip_count: data.evictions.len(),
        mean_filings_per_zip: mean(&filings),
        judgment_rate: rate(judgments, filings.iter().sum()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::distance_in;
    use crate::sample;

    fn sample_data() -> Datasets {
        Datasets {
            shelters: sample::shelters(),
            regions: sample::regions(),
            evictions: sample::evictions(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_capacity_summary_sample() {
        let data = sample_data();
        let c = capacity_summary(&data.shelters, &data.regions);
        assert_eq!(c.total_capacity, 1220);
        assert_eq!(c.total_homeless, 2594);
        assert_eq!(c.sheltered, 869);
        assert_eq!(c.unsheltered, 1725);
        assert_eq!(c.capacity_gap, 1374);
        assert!((c.utilization.unwrap() - 0.712).abs() < 0.0005);
        assert!(approx(c.gap_share.unwrap(), 1374.0 / 2594.0));
    }

    #[test]
    fn test_capacity_by_type_sorted_descending() {
        let data = sample_data();
        let c = capacity_summary(&data.shelters, &data.regions);
        let kinds: Vec<(&str, u64)> = c
            .by_type
            .iter()
            .map(|t| (t.kind.as_str(), t.capacity))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("Emergency Shelter", 550),
                ("Veterans Shelter", 400),
                ("Transitional Housing", 150),
                ("Women's Shelter", 120),
            ]
        );
        let shares: f64 = c.by_type.iter().filter_map(|t| t.share).sum();
        assert!(approx(shares, 1.0));
    }

    #[test]
    fn test_capacity_without_shelters_is_undefined_not_fatal() {
        let data = sample_data();
        let c = capacity_summary(&[], &data.regions);
        assert_eq!(c.total_capacity, 0);
        assert_eq!(c.utilization, None);
        assert_eq!(c.capacity_gap, 2594);
        assert!(c.by_type.is_empty());
    }

    #[test]
    fn test_geographic_summary_order_and_ranking() {
        let g = geographic_summary(&sample::regions());
        let names: Vec<&str> = g.regions.iter().map(|r| r.region_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Downtown San Diego",
                "East Village",
                "Midway District",
                "North Park",
                "Pacific Beach"
            ]
        );
        assert_eq!(g.total_count, 2594);
        assert_eq!(g.unsheltered_count, 1725);
        assert_eq!(g.need_ranking[0], "DT");
        assert_eq!(g.need_ranking[1], "EV");
        assert!(approx(g.regions[0].density, 1268.0 / 1.7));
    }

    #[test]
    fn test_eviction_summary_sample() {
        let e = eviction_summary(&sample::evictions());
        assert_eq!(e.total_filings, 166);
        assert_eq!(e.total_judgments, 115);
        assert!(approx(e.judgment_rate.unwrap(), 115.0 / 166.0));
        assert_eq!(e.neighborhoods[0].zip_code, "92101");
        assert_eq!(e.neighborhoods[1].zip_code, "92104");
    }

    #[test]
    fn test_eviction_zero_filings_rate_is_undefined() {
        let mut records = sample::evictions();
        records.truncate(1);
        records[0].eviction_filings = 0;
        records[0].eviction_judgments = 0;
        let e = eviction_summary(&records);
        assert_eq!(e.judgment_rate, None);
        assert_eq!(e.neighborhoods[0].judgment_rate, None);
    }

    #[test]
    fn test_nearest_shelter_to_downtown() {
        let shelters = sample::shelters();
        let regions = sample::regions();
        let downtown = &regions[0];
        let found = nearest_shelters(
            std::slice::from_ref(downtown),
            &shelters,
            DistanceUnit::Kilometers,
        );

        let rescue = distance_in(downtown.location, shelters[1].location, DistanceUnit::Kilometers);
        let connections =
            distance_in(downtown.location, shelters[4].location, DistanceUnit::Kilometers);
        assert!(rescue < connections);

        assert_eq!(found[0].shelter_name.as_deref(), Some("San Diego Rescue Mission"));
        assert!(approx(found[0].distance.unwrap(), rescue));
        for s in &shelters {
            let d = distance_in(downtown.location, s.location, DistanceUnit::Kilometers);
            assert!(found[0].distance.unwrap() <= d);
        }
    }

    #[test]
    fn test_nearest_shelters_without_shelters() {
        let found = nearest_shelters(&sample::regions(), &[], DistanceUnit::Miles);
        assert_eq!(found.len(), 5);
        assert!(found.iter().all(|n| n.shelter_name.is_none() && n.distance.is_none()));
    }

    #[test]
    fn test_dataset_statistics_sample() {
        let s = dataset_statistics(&sample_data());
        assert_eq!(s.shelter_count, 5);
        assert!(approx(s.mean_capacity, 244.0));
        assert!(approx(s.median_capacity, 200.0));
        assert!(approx(s.latitude_spread, 32.7541 - 32.7072));
        assert!(approx(s.mean_per_region, 2594.0 / 5.0));
        assert!(approx(s.sheltered_share.unwrap() + s.unsheltered_share.unwrap(), 1.0));
        assert!(approx(s.mean_filings_per_zip, 166.0 / 5.0));
    }

    #[test]
    fn test_build_empty_datasets() {
        let report = AnalysisReport::build(&Datasets::default(), DistanceUnit::Miles);
        assert_eq!(report.capacity.total_capacity, 0);
        assert_eq!(report.capacity.utilization, None);
        assert_eq!(report.evictions.judgment_rate, None);
        assert!(report.nearest_shelters.is_empty());
        assert_eq!(report.statistics.latitude_spread, 0.0);
        assert_eq!(report.distance_unit, "mi");
    }
}
