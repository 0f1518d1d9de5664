// tests/fetch_pipeline.rs
mod common;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use common::{write_manifest, FakeFetcher, API};
use nhsn_archive::config::FetchOptions;
use nhsn_archive::error::Error;
use nhsn_archive::manifest::Manifest;
use nhsn_archive::release::Channel;
use nhsn_archive::runner::run_fetch;
use nhsn_archive::snapshot::SnapshotTable;

fn opts(dir: &Path) -> FetchOptions {
    FetchOptions {
        dataset_dir: dir.to_path_buf(),
        api_base: API.to_string(),
        now: Some("2025-01-08T12:00:00".to_string()),
        ..FetchOptions::default()
    }
}

/// filename → bytes, for byte-for-byte comparisons.
fn snapshot_dir(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| {
            let e = e.unwrap();
            (e.file_name().to_string_lossy().into_owned(), fs::read(e.path()).unwrap())
        })
        .collect()
}

#[test]
fn export_writes_snapshot_latest_copy_and_manifest_entry() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), vec![]);
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-03T15:00:00.000Z");

    let summary = run_fetch(&opts(dir.path()), &client).unwrap();
    assert_eq!(summary.channel, Channel::Preliminary);
    assert_eq!(summary.filename, "nhsn_2025-01-08.csv");
    assert_eq!(summary.rows, 2);
    assert!(summary.manifest_updated);
    assert!(!summary.already_archived);

    let archived = fs::read_to_string(dir.path().join("nhsn_2025-01-08.csv")).unwrap();
    let latest = fs::read_to_string(dir.path().join("nhsn_latest.csv")).unwrap();
    assert_eq!(archived, latest);
    let table = SnapshotTable::from_csv(&archived, "weekendingdate", "jurisdiction").unwrap();
    assert_eq!(table.rows()[0].jurisdiction, "CA");
    assert_eq!(table.rows()[0].cells[0], "90");

    let manifest = Manifest::load(&dir.path().join("metadata.yaml")).unwrap();
    assert_eq!(manifest.files.len(), 1);
    let e = &manifest.files[0];
    assert_eq!(e.filename, "nhsn_2025-01-08.csv");
    assert_eq!(e.release, "preliminary");
    assert_eq!(e.fetch_trigger, "manual");
    assert_eq!(e.data_updated_at, "2025-01-08T15:00:00.000Z");
    assert_eq!(e.fetched_on, "2025-01-08T12:00:00-05:00");
}

#[test]
fn no_export_leaves_the_archive_byte_for_byte_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), vec![common::entry("nhsn_2025-01-01.csv", "2025-01-01T15:00:00.000Z")]);
    common::write_snapshot(dir.path(), "nhsn_2025-01-01.csv", &[("2024-12-21", "USA", "7")]);
    let before = snapshot_dir(dir.path());

    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z");
    let o = FetchOptions { export: false, ..opts(dir.path()) };
    let summary = run_fetch(&o, &client).unwrap();

    assert!(summary.files_written.is_empty());
    assert!(!summary.manifest_updated);
    assert_eq!(snapshot_dir(dir.path()), before);
}

#[test]
fn fetching_the_same_as_of_day_twice_overwrites_and_appends() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), vec![]);
    let o = opts(dir.path());

    let first = run_fetch(&o, &FakeFetcher::nhsn("2025-01-01T00:00:00Z", "2025-01-08T15:00:00.000Z")).unwrap();
    assert!(!first.overwrote);

    // consolidated republished later the same (New York) day
    let later = FakeFetcher::nhsn("2025-01-01T00:00:00Z", "2025-01-08T20:00:00.000Z");
    let second = run_fetch(&o, &later).unwrap();
    assert!(second.overwrote);
    assert!(second.already_archived);
    assert_eq!(second.filename, first.filename);

    let manifest = Manifest::load(&dir.path().join("metadata.yaml")).unwrap();
    let names: Vec<&str> = manifest.files.iter().map(|e| e.filename.as_str()).collect();
    assert_eq!(names, vec!["nhsn_2025-01-08.csv", "nhsn_2025-01-08.csv"]);
    assert_eq!(manifest.files[1].data_updated_at, "2025-01-08T20:00:00.000Z");
}

#[test]
fn archive_name_uses_the_new_york_calendar_day() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), vec![]);
    let client = FakeFetcher::nhsn("2024-01-01T00:00:00Z", "2025-01-09T02:00:00.000Z");
    let s = run_fetch(&opts(dir.path()), &client).unwrap();
    assert_eq!(s.as_of_date, NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
    assert!(dir.path().join("nhsn_2025-01-08.csv").is_file());
}

#[test]
fn missing_manifest_fails_before_any_request() {
    let dir = tempfile::tempdir().unwrap();
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z");
    let err = run_fetch(&opts(dir.path()), &client).unwrap_err();
    assert!(matches!(err, Error::ManifestLoad { .. }));
    assert!(client.calls().is_empty());
}

#[test]
fn init_metadata_bootstraps_a_new_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("fresh");
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z");
    let o = FetchOptions { init_metadata: true, comments: Some("first run".to_string()), ..opts(&archive) };

    run_fetch(&o, &client).unwrap();
    let manifest = Manifest::load(&archive.join("metadata.yaml")).unwrap();
    assert_eq!(manifest.files.len(), 1);
    assert_eq!(manifest.files[0].release, "consolidated");
    assert_eq!(manifest.files[0].comments.as_deref(), Some("first run"));
}

#[test]
fn failed_first_run_leaves_no_manifest_behind() {
    let dir = tempfile::tempdir().unwrap();
    let o = FetchOptions { init_metadata: true, ..opts(dir.path()) };

    // metadata answers, the data endpoint does not
    let client = FakeFetcher::new()
        .with(format!("{API}/api/views/metadata/v1/mpgq-jmmr"), serde_json::json!({ "dataUpdatedAt": "2025-01-08T15:00:00.000Z" }))
        .with(format!("{API}/api/views/metadata/v1/ua7e-t2fy"), serde_json::json!({ "dataUpdatedAt": "2025-01-01T15:00:00.000Z" }));
    assert!(matches!(run_fetch(&o, &client), Err(Error::RemoteFetch { .. })));
    assert!(snapshot_dir(dir.path()).is_empty());

    let broken = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z")
        .with(format!("{API}/resource/ua7e-t2fy.json"), serde_json::json!([]));
    assert!(matches!(run_fetch(&o, &broken), Err(Error::DataParse(_))));
    assert!(!dir.path().join("metadata.yaml").exists());
}

#[test]
fn flags_gate_latest_copy_and_manifest_update() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), vec![]);
    let manifest_before = fs::read(dir.path().join("metadata.yaml")).unwrap();
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z");
    let o = FetchOptions { save_latest: false, update_metadata: false, ..opts(dir.path()) };

    let s = run_fetch(&o, &client).unwrap();
    assert_eq!(s.files_written, vec![dir.path().join("nhsn_2025-01-08.csv")]);
    assert!(!dir.path().join("nhsn_latest.csv").exists());
    assert_eq!(fs::read(dir.path().join("metadata.yaml")).unwrap(), manifest_before);
}

#[test]
fn bad_inputs_are_reported_as_such() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path(), vec![]);
    let client = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z");

    let o = FetchOptions { release: "nightly".to_string(), ..opts(dir.path()) };
    assert!(matches!(run_fetch(&o, &client), Err(Error::InvalidRelease(_))));

    let o = FetchOptions { now: Some("tomorrow-ish".to_string()), ..opts(dir.path()) };
    assert!(matches!(run_fetch(&o, &client), Err(Error::Config(_))));

    let broken = FakeFetcher::nhsn("2025-01-08T15:00:00.000Z", "2025-01-08T15:00:00.000Z")
        .with(format!("{API}/resource/ua7e-t2fy.json"), serde_json::json!({ "error": "oops" }));
    assert!(matches!(run_fetch(&opts(dir.path()), &broken), Err(Error::DataParse(_))));
}
