use sd_homeless_data::analysis::AnalysisReport;
use sd_homeless_data::geo::DistanceUnit;
use sd_homeless_data::loader::{load_all, raw_path};
use sd_homeless_data::models::Dataset;
use sd_homeless_data::output::{create_directories, write_dataset, write_json};
use sd_homeless_data::report;
use std::fs;
use std::path::PathBuf;

fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&dir);
    create_directories(&dir).expect("create data directories");
    for dataset in Dataset::ALL {
        write_dataset(&dir, dataset).expect("write sample dataset");
    }
    dir
}

#[test]
fn test_full_pipeline() {
    let dir = data_dir("sd_homeless_data_it_pipeline");
    let data = load_all(&dir).expect("Failed to load datasets");
    let analysis = AnalysisReport::build(&data, DistanceUnit::Miles);

    assert_eq!(analysis.capacity.total_capacity, 1220);
    assert_eq!(analysis.capacity.total_homeless, 2594);
    assert_eq!(analysis.capacity.sheltered, 869);
    assert_eq!(analysis.capacity.unsheltered, 1725);
    assert_eq!(analysis.capacity.capacity_gap, 1374);
    assert!((analysis.capacity.utilization.unwrap() - 0.712).abs() < 0.0005);

    let downtown = &analysis.nearest_shelters[0];
    assert_eq!(downtown.region_name, "Downtown San Diego");
    assert_eq!(downtown.shelter_name.as_deref(), Some("San Diego Rescue Mission"));

    let summary = report::export_summary(&analysis);
    assert!(summary.contains("Total Capacity: 1,220 beds"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_json_report_is_written_and_parses_back() {
    let dir = data_dir("sd_homeless_data_it_json");
    let data = load_all(&dir).unwrap();
    let analysis = AnalysisReport::build(&data, DistanceUnit::Miles);

    let printed: serde_json::Value =
        serde_json::from_str(&report::render_json(&analysis).unwrap()).unwrap();
    assert_eq!(printed["capacity"]["total_capacity"], 1220);

    let path = dir.join("analysis_summary.json");
    write_json(&path, &analysis).unwrap();
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(saved["capacity"]["total_capacity"], 1220);
    assert_eq!(saved, printed);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_download_summary_uses_data_dir() {
    let dir = data_dir("sd_homeless_data_it_summary");
    let data = load_all(&dir).unwrap();

    let summary = report::download_summary(&data, &dir, chrono::Local::now());
    for dataset in Dataset::ALL {
        let path = raw_path(&dir, dataset);
        assert!(path.is_file());
        assert!(summary.contains(&path.display().to_string()));
    }

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_invalid_row_fails_the_load() {
    let dir = data_dir("sd_homeless_data_it_invalid");
    let path = raw_path(&dir, Dataset::Evictions);
    let content = fs::read_to_string(&path).unwrap();
    // Judgments above filings in the first data row
    let broken = content.replacen(",45,32,", ",45,46,", 1);
    assert_ne!(content, broken);
    fs::write(&path, broken).unwrap();

    let err = load_all(&dir).unwrap_err();
    assert!(format!("{err:#}").contains("exceed"));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_dataset_fails_the_load() {
    let dir = data_dir("sd_homeless_data_it_missing");
    fs::remove_file(raw_path(&dir, Dataset::Pit)).unwrap();

    assert!(load_all(&dir).is_err());

    fs::remove_dir_all(&dir).unwrap();
}
