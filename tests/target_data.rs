// tests/target_data.rs
mod common;

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use common::{write_snapshot, FakeFetcher, API};
use nhsn_archive::config::TargetOptions;
use nhsn_archive::error::Error;
use nhsn_archive::runner::run_target;
use nhsn_archive::snapshot::SnapshotTable;
use nhsn_archive::specs::nhsn::Disease;

const LOCATIONS: &str = "\
abbreviation,location,location_name,population
US,US,United States,330000000
CA,06,California,39000000
";

fn opts(dir: &Path) -> TargetOptions {
    let locations = dir.join("aux_data/us_locations.csv");
    fs::create_dir_all(locations.parent().unwrap()).unwrap();
    fs::write(&locations, LOCATIONS).unwrap();
    TargetOptions {
        api_base: API.to_string(),
        locations_file: locations,
        truth_file: dir.join("hosp_data/truth_latest.csv"),
        nhsn_file: dir.join("hosp_data/NHSN/nhsn_hosp_latest.csv"),
        ..TargetOptions::default()
    }
}

fn rate(value: f64, population: f64) -> String {
    (value / population * 1e5).to_string()
}

#[test]
fn fetched_release_becomes_target_data() {
    let dir = tempfile::tempdir().unwrap();
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-03T15:00:00.000Z");
    let o = TargetOptions { disease: Disease::C19, release: "consolidated".to_string(), ..opts(dir.path()) };

    let summary = run_target(&o, &client).unwrap();
    assert_eq!(summary.source, "consolidated");
    assert_eq!(summary.rows, 2);
    assert!(summary.unmatched.is_empty());
    assert_eq!(summary.files_written, vec![o.nhsn_file.clone(), o.truth_file.clone()]);

    let truth = fs::read_to_string(&o.truth_file).unwrap();
    let expected = format!(
        "date,location,location_name,value,weekly_rate\n\
         2024-12-28,06,California,100,{}\n\
         2024-12-28,US,United States,1000,{}\n",
        rate(100.0, 39_000_000.0),
        rate(1000.0, 330_000_000.0),
    );
    assert_eq!(truth, expected);

    // the raw dataset is kept in archive form
    let nhsn = fs::read_to_string(&o.nhsn_file).unwrap();
    let table = SnapshotTable::from_csv(&nhsn, "weekendingdate", "jurisdiction").unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn archived_snapshot_is_converted_without_the_network() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "nhsn_2025-01-08.csv", &[
        ("2024-12-21", "USA", "70"),
        ("2024-12-14", "USA", "60"),
        ("2024-12-14", "CA", "6"),
        ("2024-12-14", "PR", "2"),
        ("2024-12-21", "VI", ""),
    ]);
    let client = FakeFetcher::new();
    let o = TargetOptions {
        disease: "influenza".parse().unwrap(),
        input: Some(dir.path().join("nhsn_2025-01-08.csv")),
        ..opts(dir.path())
    };

    let summary = run_target(&o, &client).unwrap();
    assert!(client.calls().is_empty());
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.unmatched, vec!["PR".to_string(), "VI".to_string()]);
    assert_eq!(summary.files_written, vec![o.truth_file.clone()]);
    assert!(!o.nhsn_file.exists());

    let truth = fs::read_to_string(&o.truth_file).unwrap();
    let locations: Vec<&str> = truth.lines().skip(1).map(|l| l.split(',').nth(1).unwrap()).collect();
    assert_eq!(locations, vec!["06", "US", "US"]);
}

#[test]
fn bad_locations_fail_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-03T15:00:00.000Z");

    let o = TargetOptions { locations_file: dir.path().join("nope.csv"), ..opts(dir.path()) };
    assert!(matches!(run_target(&o, &client), Err(Error::Locations { .. })));

    let o = opts(dir.path());
    fs::write(&o.locations_file, "abbreviation,location\nCA,06\n").unwrap();
    assert!(matches!(run_target(&o, &client), Err(Error::Locations { .. })));
    assert!(client.calls().is_empty());
}

#[test]
fn snapshot_without_the_disease_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "nhsn_2025-01-08.csv", &[("2024-12-14", "CA", "6")]);
    let o = TargetOptions {
        disease: Disease::Rsv,
        input: Some(dir.path().join("nhsn_2025-01-08.csv")),
        ..opts(dir.path())
    };
    assert!(matches!(run_target(&o, &FakeFetcher::new()), Err(Error::DataParse(_))));
    assert!(!o.truth_file.exists());
}
