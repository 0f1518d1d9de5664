// src/report/mod.rs
//! Report-build pipeline: manifest → archive table → figures → static site.
//!
//! The pipeline only reads the archive; nothing under the dataset directory
//! is ever written from here.

pub mod assemble;
pub mod figure;
pub mod loader;
pub mod page;
pub mod site;
pub mod table;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::config::ReportOptions;
use crate::core::dates::{local_date, now_in, parse_timestamp_in};
use crate::error::{Error, Result, SnapshotSkipped};
use crate::manifest::Manifest;
use crate::progress::Progress;

pub use loader::{load_archive, LoadOutcome};
pub use page::PageContext;
pub use table::ArchiveTable;

#[derive(Clone, Debug, PartialEq)]
pub struct ReportSummary {
    pub loaded: usize,
    pub skipped: Vec<SnapshotSkipped>,
    pub figures: usize,
    pub report_date: NaiveDate,
    pub latest_as_of: NaiveDate,
    pub index_path: PathBuf,
}

fn report_date(opts: &ReportOptions) -> Result<NaiveDate> {
    let tz = opts.tz()?;
    let now = match &opts.now {
        Some(s) => parse_timestamp_in(s, tz).map_err(|e| Error::Config(format!("--now: {e}")))?,
        None => now_in(tz),
    };
    Ok(local_date(&now, tz))
}

pub fn run_report(opts: &ReportOptions, progress: &mut dyn Progress) -> Result<ReportSummary> {
    let report_date = report_date(opts)?;

    let manifest = Manifest::load(&opts.metadata_path())?;
    let LoadOutcome { table, skipped } = load_archive(&manifest, opts, progress)?;
    // load_archive never returns an empty table
    let latest_as_of = table.latest_as_of().ok_or(Error::NoData { skipped: skipped.len() })?;

    progress.log("Building figures");
    let figures = assemble::build_figures(&table, opts, progress);

    let mut plots = Vec::with_capacity(figures.len());
    for (disease, fig) in &figures {
        let id = format!("{}-plot", disease.code());
        plots.push((*disease, fig.to_html_snippet(&id)?));
    }

    let ctx = PageContext {
        report_date,
        latest_as_of,
        snapshot_count: table.len(),
        plots,
    };
    let index_path = site::export_site(opts, &ctx)?;
    logi!("Report written to {}", index_path.display());

    Ok(ReportSummary {
        loaded: table.len(),
        skipped,
        figures: figures.len(),
        report_date,
        latest_as_of,
        index_path,
    })
}
