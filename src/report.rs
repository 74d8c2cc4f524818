//! Human-readable rendering of analysis results.
//!
//! Undefined ratios render as `N/A`.

use chrono::{DateTime, Local};
use std::path::Path;

use crate::aggregate::total;
use crate::analysis::{
    AnalysisReport, CapacitySummary, DatasetStatistics, EvictionSummary, GeographicSummary,
    NearestShelter,
};
use crate::loader::{Datasets, raw_path};
use crate::models::Dataset;

const RULE_WIDTH: usize = 60;

fn rule(ch: char, width: usize) -> String {
    std::iter::repeat_n(ch, width).collect()
}

fn heading(title: &str) -> Vec<String> {
    vec![
        String::new(),
        rule('=', RULE_WIDTH),
        title.to_string(),
        rule('=', RULE_WIDTH),
    ]
}

/// Formats a ratio as a percentage with one decimal, or `N/A`.
pub fn fmt_percent(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{:.1}%", r * 100.0),
        None => "N/A".to_string(),
    }
}

/// Formats an integer with comma thousands separators.
pub fn fmt_count<N: Into<i128>>(n: N) -> String {
    let n: i128 = n.into();
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        out.insert(0, '-');
    }
    out
}

pub fn render_capacity(c: &CapacitySummary) -> String {
    let mut lines = heading("CAPACITY ANALYSIS");
    lines.push(String::new());
    lines.push(format!("Total Shelter Capacity:      {} beds", fmt_count(c.total_capacity)));
    lines.push(format!("Total Homeless Population:   {} people", fmt_count(c.total_homeless)));
    lines.push(format!("Currently Sheltered:         {} people", fmt_count(c.sheltered)));
    lines.push(format!("Currently Unsheltered:       {} people", fmt_count(c.unsheltered)));
    lines.push(String::new());
    lines.push(format!("Capacity Utilization:        {}", fmt_percent(c.utilization)));
    lines.push(format!(
        "Capacity Gap:                {} beds ({} of need)",
        fmt_count(c.capacity_gap),
        fmt_percent(c.gap_share)
    ));
    lines.push(String::new());
    lines.push("Shelter Capacity by Type:".to_string());
    for t in &c.by_type {
        lines.push(format!(
            "  {:<30}: {:>4} beds ({:>6})",
            t.kind,
            t.capacity,
            fmt_percent(t.share)
        ));
    }
    lines.join("\n")
}

pub fn render_geography(g: &GeographicSummary) -> String {
    let mut lines = heading("GEOGRAPHIC DISTRIBUTION ANALYSIS");
    lines.push(String::new());
    lines.push("Homeless Population by Region:".to_string());
    lines.push(format!(
        "{:<25} {:>8} {:>12} {:>8} {:>12}",
        "Region", "Total", "Unsheltered", "Rate", "Density"
    ));
    lines.push(rule('-', 70));
    for r in &g.regions {
        lines.push(format!(
            "{:<25} {:>8} {:>12} {:>8} {:>9.1}/mi²",
            r.region_name,
            fmt_count(r.total_count),
            fmt_count(r.unsheltered_count),
            fmt_percent(r.unsheltered_rate),
            r.density
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "{:<25} {:>8} {:>12}",
        "TOTAL",
        fmt_count(g.total_count),
        fmt_count(g.unsheltered_count)
    ));
    if !g.need_ranking.is_empty() {
        lines.push(format!("Highest need by density: {}", g.need_ranking.join(" > ")));
    }
    lines.join("\n")
}

pub fn render_evictions(e: &EvictionSummary) -> String {
    let mut lines = heading("EVICTION ANALYSIS");
    lines.push(String::new());
    lines.push(format!("Total Eviction Filings:      {}", fmt_count(e.total_filings)));
    lines.push(format!("Total Eviction Judgments:    {}", fmt_count(e.total_judgments)));
    lines.push(format!("Overall Approval Rate:       {}", fmt_percent(e.judgment_rate)));
    lines.push(String::new());
    lines.push("Evictions by Neighborhood:".to_string());
    lines.push(format!(
        "{:<20} {:>6} {:>8} {:>10} {:>8}",
        "Neighborhood", "ZIP", "Filings", "Judgments", "Rate"
    ));
    lines.push(rule('-', RULE_WIDTH));
    for n in &e.neighborhoods {
        lines.push(format!(
            "{:<20} {:>6} {:>8} {:>10} {:>8}",
            n.neighborhood,
            n.zip_code,
            n.filings,
            n.judgments,
            fmt_percent(n.judgment_rate)
        ));
    }
    lines.join("\n")
}

pub fn render_distances(nearest: &[NearestShelter], unit: &str) -> String {
    let mut lines = heading("GEOGRAPHIC DISTANCE ANALYSIS");
    lines.push(String::new());
    lines.push("Distance from High-Need Areas to Nearest Shelter:".to_string());
    lines.push(format!("{:<25} {:<30} {:>10}", "Region", "Nearest Shelter", "Distance"));
    lines.push(rule('-', 70));
    for n in nearest {
        let distance = match n.distance {
            Some(d) => format!("{d:.2} {unit}"),
            None => "N/A".to_string(),
        };
        lines.push(format!(
            "{:<25} {:<30} {:>10}",
            n.region_name,
            n.shelter_name.as_deref().unwrap_or("N/A"),
            distance
        ));
    }
    lines.join("\n")
}

pub fn render_statistics(
    s: &DatasetStatistics,
    c: &CapacitySummary,
    e: &EvictionSummary,
) -> String {
    let mut lines = heading("SUMMARY STATISTICS");
    lines.push(String::new());
    lines.push("Dataset Statistics:".to_string());
    lines.push(String::new());
    lines.push("Shelter Data:".to_string());
    lines.push(format!("  - Number of facilities: {}", s.shelter_count));
    lines.push(format!("  - Total capacity: {} beds", fmt_count(c.total_capacity)));
    lines.push(format!("  - Average capacity: {:.1} beds", s.mean_capacity));
    lines.push(format!("  - Median capacity: {:.1} beds", s.median_capacity));
    lines.push(format!("  - Geographic spread: {:.4}° lat", s.latitude_spread));
    lines.push(String::new());
    lines.push("Homeless Population (PIT Count):".to_string());
    lines.push(format!("  - Total homeless: {}", fmt_count(c.total_homeless)));
    lines.push(format!(
        "  - Sheltered: {} ({})",
        fmt_count(c.sheltered),
        fmt_percent(s.sheltered_share)
    ));
    lines.push(format!(
        "  - Unsheltered: {} ({})",
        fmt_count(c.unsheltered),
        fmt_percent(s.unsheltered_share)
    ));
    lines.push(format!("  - Average per region: {:.1}", s.mean_per_region));
    lines.push(String::new());
    lines.push("Eviction Data:".to_string());
    lines.push(format!("  - Total filings: {}", fmt_count(e.total_filings)));
    lines.push(format!("  - Total judgments: {}", fmt_count(e.total_judgments)));
    lines.push(format!("  - Average filings per ZIP: {:.1}", s.mean_filings_per_zip));
    lines.push(format!("  - Judgment rate: {}", fmt_percent(s.judgment_rate)));
    lines.join("\n")
}

/// Full console report, one section per analysis.
pub fn render(report: &AnalysisReport) -> String {
    [
        render_capacity(&report.capacity),
        render_geography(&report.geography),
        render_evictions(&report.evictions),
        render_distances(&report.nearest_shelters, report.distance_unit),
        render_statistics(&report.statistics, &report.capacity, &report.evictions),
    ]
    .join("\n")
}

/// The full report as pretty-printed JSON.
pub fn render_json(report: &AnalysisReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Short plain-text summary written to `analysis_summary.txt`.
pub fn export_summary(report: &AnalysisReport) -> String {
    let lines = [
        "San Diego Homelessness Data Analysis Report".to_string(),
        rule('=', RULE_WIDTH),
        String::new(),
        "SHELTER CAPACITY".to_string(),
        format!("Total Shelters: {}", report.statistics.shelter_count),
        format!("Total Capacity: {} beds", fmt_count(report.capacity.total_capacity)),
        String::new(),
        "HOMELESS POPULATION".to_string(),
        format!("Total: {}", fmt_count(report.capacity.total_homeless)),
        format!("Sheltered: {}", fmt_count(report.capacity.sheltered)),
        format!("Unsheltered: {}", fmt_count(report.capacity.unsheltered)),
        String::new(),
        "EVICTIONS".to_string(),
        format!("Total Filings: {}", fmt_count(report.evictions.total_filings)),
        format!("Total Judgments: {}", fmt_count(report.evictions.total_judgments)),
    ];
    lines.join("\n")
}

/// Text written to `DOWNLOAD_SUMMARY.txt` after the sample data is saved.
///
/// File paths are reported under `data_dir` as the loader resolves them.
pub fn download_summary(data: &Datasets, data_dir: &Path, completed: DateTime<Local>) -> String {
    let capacity = total(&data.shelters, |s| u64::from(s.capacity));
    let homeless = total(&data.regions, |r| u64::from(r.total_count));
    let unsheltered = total(&data.regions, |r| u64::from(r.unsheltered_count));
    let sheltered = total(&data.regions, |r| u64::from(r.sheltered_count));
    let filings = total(&data.evictions, |e| u64::from(e.eviction_filings));
    let judgments = total(&data.evictions, |e| u64::from(e.eviction_judgments));

    format!(
        "
DATA DOWNLOAD SUMMARY
{rule}
Download completed: {completed}

1. SHELTER LOCATIONS
   - Records: {shelters}
   - Total capacity: {capacity} beds
   - Geographic coverage: San Diego County
   - File: {shelters_file}

2. POINT-IN-TIME COUNT (2024)
   - Regions: {regions}
   - Total homeless: {homeless}
   - Unsheltered: {unsheltered}
   - Sheltered: {sheltered}
   - File: {pit_file}

3. EVICTION DATA (January 2024)
   - ZIP codes: {zips}
   - Total filings: {filings}
   - Total judgments: {judgments}
   - File: {evictions_file}

All datasets include latitude and longitude coordinates for mapping.
{rule}
",
        rule = rule('=', RULE_WIDTH),
        completed = completed.format("%Y-%m-%d %H:%M:%S"),
        shelters = data.shelters.len(),
        regions = data.regions.len(),
        zips = data.evictions.len(),
        shelters_file = raw_path(data_dir, Dataset::Shelters).display(),
        pit_file = raw_path(data_dir, Dataset::Pit).display(),
        evictions_file = raw_path(data_dir, Dataset::Evictions).display(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::DistanceUnit;
    use crate::sample;

    fn sample_report() -> AnalysisReport {
        let data = Datasets {
            shelters: sample::shelters(),
            regions: sample::regions(),
            evictions: sample::evictions(),
        };
        AnalysisReport::build(&data, DistanceUnit::Miles)
    }

    #[test]
    fn test_fmt_percent() {
        assert_eq!(fmt_percent(Some(869.0 / 1220.0)), "71.2%");
        assert_eq!(fmt_percent(Some(0.0)), "0.0%");
        assert_eq!(fmt_percent(None), "N/A");
    }

    #[test]
    fn test_fmt_count() {
        assert_eq!(fmt_count(0u64), "0");
        assert_eq!(fmt_count(999u32), "999");
        assert_eq!(fmt_count(1220u64), "1,220");
        assert_eq!(fmt_count(1_234_567u64), "1,234,567");
        assert_eq!(fmt_count(-1374i64), "-1,374");
    }

    #[test]
    fn test_render_capacity_sample() {
        let text = render_capacity(&sample_report().capacity);
        assert!(text.contains("Total Shelter Capacity:      1,220 beds"));
        assert!(text.contains("Capacity Utilization:        71.2%"));
        assert!(text.contains("Capacity Gap:                1,374 beds (53.0% of need)"));
        assert!(text.contains("Emergency Shelter"));
    }

    #[test]
    fn test_render_distances_sample() {
        let text = render_distances(&sample_report().nearest_shelters, "mi");
        let downtown = text
            .lines()
            .find(|l| l.starts_with("Downtown San Diego"))
            .unwrap();
        assert!(downtown.contains("San Diego Rescue Mission"));
        assert!(downtown.ends_with("mi"));
    }

    #[test]
    fn test_undefined_values_render_as_na() {
        let report = AnalysisReport::build(&Datasets::default(), DistanceUnit::Kilometers);
        let text = render(&report);
        assert!(text.contains("Capacity Utilization:        N/A"));
        assert!(text.contains("Overall Approval Rate:       N/A"));
    }

    #[test]
    fn test_export_summary_sample() {
        let text = export_summary(&sample_report());
        assert!(text.starts_with("San Diego Homelessness Data Analysis Report"));
        assert!(text.contains("Total Shelters: 5"));
        assert!(text.contains("Total Capacity: 1,220 beds"));
        assert!(text.contains("Total: 2,594"));
        assert!(text.contains("Total Filings: 166"));
        assert!(text.contains("Total Judgments: 115"));
    }

    #[test]
    fn test_download_summary_sample() {
        let data = Datasets {
            shelters: sample::shelters(),
            regions: sample::regions(),
            evictions: sample::evictions(),
        };
        let text = download_summary(&data, Path::new("data"), Local::now());
        assert!(text.contains("Total capacity: 1220 beds"));
        assert!(text.contains("Total homeless: 2594"));
        assert!(text.contains("Unsheltered: 1725"));
        assert!(text.contains("Sheltered: 869"));
        assert!(text.contains("Total filings: 166"));
    }

    #[test]
    fn test_download_summary_names_files_under_data_dir() {
        let dir = Path::new("/tmp/sd_custom");
        let text = download_summary(&Datasets::default(), dir, Local::now());
        for dataset in Dataset::ALL {
            let expected = format!("File: {}", raw_path(dir, dataset).display());
            assert!(text.contains(&expected), "missing {expected:?} in {text}");
        }
        assert!(!text.contains("File: data/raw"));
    }

    #[test]
    fn test_render_json_parses_back() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["capacity"]["total_capacity"], 1220);
        assert_eq!(value["capacity"]["capacity_gap"], 1374);
        assert_eq!(value["distance_unit"], "mi");
        assert_eq!(
            value["nearest_shelters"][0]["shelter_name"],
            "San Diego Rescue Mission"
        );
    }

    #[test]
    fn test_render_json_undefined_rates_are_null() {
        let report = AnalysisReport::build(&Datasets::default(), DistanceUnit::Kilometers);
        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["capacity"]["utilization"].is_null());
    }
}
