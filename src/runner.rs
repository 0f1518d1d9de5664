// src/runner.rs
//
// Fetch-and-archive pipeline: one fetch cycle, persisted.
//
//   manifest → resolve release → fetch + parse → archive filename
//            → (export) write snapshot → copy latest → append manifest entry
//
// Target-data pipeline: one disease's hubverse target file.
//
//   locations → snapshot (archived file, or resolve + fetch + parse)
//             → join → (export) target CSV

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::{
    archive::{snapshot_filename, Archive},
    config::{consts::{DATE_COLUMN, JURISDICTION_COLUMN}, FetchOptions, TargetOptions},
    core::{dates::{local_date, now_in, parse_timestamp_in}, net::Fetcher},
    error::{Error, Result},
    file::write_atomic,
    manifest::{Manifest, ManifestEntry},
    release::{resolve, Channel, ResolvedRelease},
    snapshot::SnapshotTable,
    specs::nhsn::{interest_fields, parse_records, request_query, Disease},
    specs::target::{make_target_data, Locations},
};

/// Summary of what a fetch cycle found and produced.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchSummary {
    pub channel: Channel,
    /// Remote timestamp string, as recorded in the manifest.
    pub data_updated_at: String,
    pub as_of_date: NaiveDate,
    pub filename: String,
    pub rows: usize,
    /// Empty when export is disabled.
    pub files_written: Vec<PathBuf>,
    /// An archive file with the same name was replaced.
    pub overwrote: bool,
    /// The manifest already listed a snapshot for this as-of date.
    pub already_archived: bool,
    pub manifest_updated: bool,
}

fn resolve_now(opts: &FetchOptions) -> Result<DateTime<FixedOffset>> {
    let tz = opts.tz()?;
    match &opts.now {
        Some(s) => parse_timestamp_in(s, tz).map_err(|e| Error::Config(format!("--now: {e}"))),
        None => Ok(now_in(tz)),
    }
}

/// A bootstrapped manifest only reaches the disk at the end of a successful
/// export, so a failed first run leaves the archive directory untouched.
fn load_manifest(opts: &FetchOptions, now: &DateTime<FixedOffset>) -> Result<Manifest> {
    let path = opts.metadata_path();
    if opts.init_metadata {
        return Manifest::load_or_empty(&path, now);
    }
    Manifest::load(&path)
}

/// Resolve `release` and fetch its dataset.
fn fetch_release(
    client: &dyn Fetcher,
    api_base: &str,
    release: &str,
    entry_limit: u32,
) -> Result<(ResolvedRelease, SnapshotTable)> {
    let release = resolve(release, client, api_base)?;
    logi!(
        "Using {} release, data updated at {}",
        release.channel, release.metadata.data_updated_at
    );

    let fields = interest_fields();
    let query = request_query(entry_limit, DATE_COLUMN, JURISDICTION_COLUMN, &fields);
    let payload = client.get_json(&release.data_url, &query)?;
    logi!("Parsing response...");
    let table = parse_records(&payload, DATE_COLUMN, JURISDICTION_COLUMN, &fields)?;
    if payload.as_array().is_some_and(|a| a.len() >= entry_limit as usize) {
        logw!("Response hit the entry limit ({entry_limit}); the dataset may be truncated");
    }
    logi!("Parsed {} rows", table.len());
    Ok((release, table))
}

/// Run one fetch cycle against `client`.
pub fn run_fetch(opts: &FetchOptions, client: &dyn Fetcher) -> Result<FetchSummary> {
    let tz = opts.tz()?;
    let now = resolve_now(opts)?;

    // 1) Manifest first: a broken archive should fail before any network traffic.
    let mut manifest = load_manifest(opts, &now)?;
    logd!("Manifest lists {} snapshots", manifest.files.len());

    // 2-3) Which release, then its dataset
    let (release, table) = fetch_release(client, &opts.api_base, &opts.release, opts.entry_limit)?;

    // 4) Archive filename from the as-of calendar date
    let as_of_date = local_date(&release.metadata.as_of, tz);
    let filename = snapshot_filename(as_of_date);
    let already_archived = match manifest.find_as_of_date(as_of_date, tz) {
        Some(prior) => {
            logw!(
                "As-of date {as_of_date} is already in the manifest ({}); a second entry will be appended",
                prior.filename
            );
            true
        }
        None => false,
    };

    let mut summary = FetchSummary {
        channel: release.channel,
        data_updated_at: release.metadata.data_updated_at.clone(),
        as_of_date,
        filename: filename.clone(),
        rows: table.len(),
        files_written: Vec::new(),
        overwrote: false,
        already_archived,
        manifest_updated: false,
    };

    if !opts.export {
        logw!("Export disabled: no files were written and the manifest was not updated");
        return Ok(summary);
    }

    // 5) Persist
    let archive = Archive::new(&opts.dataset_dir, DATE_COLUMN, JURISDICTION_COLUMN);
    let (path, overwrote) = archive.write(&filename, &table)?;
    summary.overwrote = overwrote;
    summary.files_written.push(path.clone());

    if opts.save_latest {
        summary.files_written.push(archive.copy_to_latest(&path)?);
    }

    if opts.update_metadata {
        manifest.push(
            ManifestEntry {
                filename,
                fetched_on: now.to_rfc3339(),
                data_updated_at: release.metadata.data_updated_at,
                fetch_trigger: opts.fetch_trigger.clone(),
                release: s!(release.channel.label()),
                comments: opts.comments.clone(),
            },
            &now,
        );
        manifest.save(&opts.metadata_path())?;
        summary.manifest_updated = true;
        logi!("Manifest updated: {}", opts.metadata_path().display());
    }

    logi!("Exporting done.");
    Ok(summary)
}

/* ---------------- target data ---------------- */

#[derive(Clone, Debug, PartialEq)]
pub struct TargetSummary {
    pub disease: Disease,
    /// Release channel fetched, or the snapshot file converted.
    pub source: String,
    pub rows: usize,
    /// Jurisdictions dropped for lack of a location entry.
    pub unmatched: Vec<String>,
    pub files_written: Vec<PathBuf>,
}

fn read_snapshot(path: &Path) -> Result<SnapshotTable> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    SnapshotTable::from_csv(&text, DATE_COLUMN, JURISDICTION_COLUMN)
        .map_err(|e| Error::DataParse(format!("{}: {e}", path.display())))
}

/// Build one disease's target data, from `opts.input` when set and from the
/// remote release otherwise.
pub fn run_target(opts: &TargetOptions, client: &dyn Fetcher) -> Result<TargetSummary> {
    // 1) Locations first: a bad table should fail before any network traffic.
    let locations = Locations::load(&opts.locations_file)?;

    // 2) Snapshot
    let mut files_written = Vec::new();
    let (table, source) = match &opts.input {
        Some(path) => {
            logi!("Reading snapshot {}", path.display());
            (read_snapshot(path)?, path.display().to_string())
        }
        None => {
            let (release, table) = fetch_release(client, &opts.api_base, &opts.release, opts.entry_limit)?;
            if opts.export_nhsn {
                logi!("Exporting NHSN data to {}...", opts.nhsn_file.display());
                write_atomic(&opts.nhsn_file, table.to_csv(DATE_COLUMN, JURISDICTION_COLUMN))?;
                files_written.push(opts.nhsn_file.clone());
            }
            (table, s!(release.channel.label()))
        }
    };

    // 3) Join
    let target = make_target_data(&table, opts.disease, &locations)?;
    logi!("{} target rows for {}", target.rows.len(), opts.disease.name());

    // 4) Export
    if opts.export_truth {
        logi!("Exporting target data to {}...", opts.truth_file.display());
        write_atomic(&opts.truth_file, target.to_csv())?;
        files_written.push(opts.truth_file.clone());
    }

    Ok(TargetSummary {
        disease: opts.disease,
        source,
        rows: target.rows.len(),
        unmatched: target.unmatched,
        files_written,
    })
}
