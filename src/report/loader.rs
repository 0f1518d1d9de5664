// src/report/loader.rs
//
// Manifest → unified archive table. Each entry is checked in turn:
//   missing file → stale as-of → duplicate as-of → unparseable
// and the first check that fails skips the entry. Only an empty result is fatal.

use chrono::NaiveTime;

use crate::archive::Archive;
use crate::config::ReportOptions;
use crate::core::dates::{local_date, local_naive};
use crate::error::{Error, Result, SkipReason, SnapshotSkipped};
use crate::manifest::{Manifest, ManifestEntry};
use crate::progress::Progress;

use super::table::ArchiveTable;

#[derive(Debug)]
pub struct LoadOutcome {
    pub table: ArchiveTable,
    /// In manifest order.
    pub skipped: Vec<SnapshotSkipped>,
}

fn skip(entry: &ManifestEntry, reason: SkipReason) -> SnapshotSkipped {
    let skipped = SnapshotSkipped { filename: entry.filename.clone(), reason };
    match skipped.reason {
        SkipReason::Missing | SkipReason::Duplicate { .. } => logw!("Skipping {skipped}"),
        SkipReason::Stale { .. } => logi!("Skipping {skipped}"),
        SkipReason::Unparseable(_) => loge!("Skipping {skipped}"),
    }
    skipped
}

pub fn load_archive(
    manifest: &Manifest,
    opts: &ReportOptions,
    progress: &mut dyn Progress,
) -> Result<LoadOutcome> {
    let tz = opts.tz()?;
    let cutoff = opts.minimum_as_of.and_time(NaiveTime::MIN);
    let archive = Archive::new(&opts.dataset_dir, &opts.date_column, &opts.jurisdiction_column);

    let mut table = ArchiveTable::new();
    let mut skipped = Vec::new();

    progress.begin(manifest.files.len());
    progress.log(&format!("Loading {} snapshots...", manifest.files.len()));

    for entry in &manifest.files {
        let outcome = (|| -> std::result::Result<_, SkipReason> {
            if !archive.path_for(&entry.filename).is_file() {
                return Err(SkipReason::Missing);
            }
            let as_of = entry.as_of().map_err(SkipReason::Unparseable)?;
            let as_of_date = local_date(&as_of, tz);
            if local_naive(&as_of, tz) < cutoff {
                return Err(SkipReason::Stale { as_of: as_of_date, cutoff: opts.minimum_as_of });
            }
            if table.contains(as_of_date) {
                return Err(SkipReason::Duplicate { as_of: as_of_date });
            }
            let snapshot = archive.read(&entry.filename).map_err(SkipReason::Unparseable)?;
            Ok((as_of_date, snapshot))
        })();

        match outcome {
            Ok((as_of_date, snapshot)) => {
                logd!("Loaded {} ({} rows, as of {as_of_date})", entry.filename, snapshot.len());
                table.insert(as_of_date, snapshot);
            }
            Err(reason) => skipped.push(skip(entry, reason)),
        }
        progress.item_done(&entry.filename);
    }
    progress.finish();

    if table.is_empty() {
        return Err(Error::NoData { skipped: skipped.len() });
    }
    logi!("Loaded {} snapshots, skipped {}", table.len(), skipped.len());
    Ok(LoadOutcome { table, skipped })
}
