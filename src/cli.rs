// src/cli.rs
//
// Command-line frontends for the pipelines. Option precedence:
//   defaults → --config settings file → flags

use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Args, Parser};

use crate::config::{FetchOptions, ReportOptions, Settings, TargetOptions};
use crate::core::HttpClient;
use crate::error::Result;
use crate::log::{self, Verbosity};
use crate::progress::LogProgress;
use crate::specs::nhsn::Disease;

#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// YAML settings file (`fetch:` / `report:` sections, all keys optional).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Archive directory holding the snapshots and metadata.yaml.
    #[arg(long)]
    pub dataset_dir: Option<PathBuf>,

    /// Override "now" (RFC 3339, or naive in the configured timezone).
    #[arg(long)]
    pub now: Option<String>,

    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,
}

impl CommonArgs {
    fn settings(&self) -> Result<Settings> {
        load_settings(self.config.as_deref())
    }

    fn init_logging(&self) {
        log::init(Verbosity::from_flags(self.verbose, self.quiet));
    }
}

fn load_settings(config: Option<&std::path::Path>) -> Result<Settings> {
    match config {
        Some(path) => Settings::load(path),
        None => Ok(Settings::default()),
    }
}

/// `--x` / `--no-x` pair → explicit value, or `None` to keep the configured one.
fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (_, true) => Some(false),
        (true, false) => Some(true),
        _ => None,
    }
}

/* ---------------- fetch ---------------- */

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nhsn_fetch",
    version,
    about = "Fetch the current NHSN weekly hospital-admission release and archive it"
)]
pub struct FetchArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// latest | preliminary (prelim) | consolidated (consol)
    #[arg(long)]
    pub release: Option<String>,

    /// Write the snapshot, latest copy and manifest entry (default).
    #[arg(long, overrides_with = "no_export")]
    pub export: bool,
    /// Resolve and fetch only; leave the archive untouched.
    #[arg(long)]
    pub no_export: bool,

    #[arg(long, overrides_with = "no_save_latest")]
    pub save_latest: bool,
    #[arg(long)]
    pub no_save_latest: bool,

    #[arg(long, overrides_with = "no_update_metadata")]
    pub update_metadata: bool,
    #[arg(long)]
    pub no_update_metadata: bool,

    /// What caused this fetch, e.g. manual or scheduled.
    #[arg(long)]
    pub fetch_trigger: Option<String>,

    /// Free text stored with the manifest entry.
    #[arg(long)]
    pub comments: Option<String>,

    /// Create an empty manifest if none exists.
    #[arg(long)]
    pub init_metadata: bool,

    #[arg(long)]
    pub entry_limit: Option<u32>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

impl FetchArgs {
    /// Settings file (if any) with these flags applied on top.
    pub fn options(&self) -> Result<FetchOptions> {
        let mut o = self.common.settings()?.fetch;
        if let Some(v) = &self.common.dataset_dir { o.dataset_dir = v.clone(); }
        if let Some(v) = &self.common.now { o.now = Some(v.clone()); }
        if let Some(v) = &self.release { o.release = v.clone(); }
        if let Some(v) = switch(self.export, self.no_export) { o.export = v; }
        if let Some(v) = switch(self.save_latest, self.no_save_latest) { o.save_latest = v; }
        if let Some(v) = switch(self.update_metadata, self.no_update_metadata) { o.update_metadata = v; }
        if let Some(v) = &self.fetch_trigger { o.fetch_trigger = v.clone(); }
        if let Some(v) = &self.comments { o.comments = Some(v.clone()); }
        if self.init_metadata { o.init_metadata = true; }
        if let Some(v) = self.entry_limit { o.entry_limit = v; }
        if let Some(v) = self.timeout_secs { o.timeout_secs = v; }
        Ok(o)
    }
}

pub fn run_fetch() -> color_eyre::Result<()> {
    let args = FetchArgs::parse();
    args.common.init_logging();
    let opts = args.options()?;
    // fail on a bad release name before building a client
    opts.release.parse::<crate::release::Release>()?;

    let client = HttpClient::new(Duration::from_secs(opts.timeout_secs));
    let summary = crate::runner::run_fetch(&opts, &client)?;

    println!(
        "{} release as of {} ({} rows) → {}",
        summary.channel, summary.data_updated_at, summary.rows, summary.filename
    );
    for path in &summary.files_written {
        println!("  wrote {}", path.display());
    }
    if summary.already_archived {
        println!("  note: as-of date {} was already archived", summary.as_of_date);
    }
    Ok(())
}

/* ---------------- report ---------------- */

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nhsn_report",
    version,
    about = "Build the as-of revision report from the snapshot archive"
)]
pub struct ReportArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Leave out snapshots published before this date (YYYY-MM-DD).
    #[arg(long)]
    pub min_as_of: Option<NaiveDate>,

    #[arg(long)]
    pub default_jurisdiction: Option<String>,

    /// Initial x-axis window, in weeks back from the latest report date.
    #[arg(long)]
    pub window_weeks: Option<u32>,

    #[arg(long)]
    pub templates_dir: Option<PathBuf>,

    /// Site output directory. Cleared on every build.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

impl ReportArgs {
    pub fn options(&self) -> Result<ReportOptions> {
        let mut o = self.common.settings()?.report;
        if let Some(v) = &self.common.dataset_dir { o.dataset_dir = v.clone(); }
        if let Some(v) = &self.common.now { o.now = Some(v.clone()); }
        if let Some(v) = self.min_as_of { o.minimum_as_of = v; }
        if let Some(v) = &self.default_jurisdiction { o.default_jurisdiction = v.clone(); }
        if let Some(v) = self.window_weeks { o.window_weeks = v; }
        if let Some(v) = &self.templates_dir { o.templates_dir = v.clone(); }
        if let Some(v) = &self.out_dir { o.out_dir = v.clone(); }
        Ok(o)
    }
}

pub fn run_report() -> color_eyre::Result<()> {
    let args = ReportArgs::parse();
    args.common.init_logging();
    let opts = args.options()?;

    let mut progress = LogProgress::default();
    let summary = crate::report::run_report(&opts, &mut progress)?;

    println!(
        "{} snapshots (latest as of {}), {} skipped, {} figures → {}",
        summary.loaded,
        summary.latest_as_of,
        summary.skipped.len(),
        summary.figures,
        summary.index_path.display()
    );
    for s in &summary.skipped {
        println!("  skipped {s}");
    }
    Ok(())
}

/* ---------------- target ---------------- */

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nhsn_target",
    version,
    about = "Build hubverse target data for one disease from the NHSN weekly dataset"
)]
pub struct TargetArgs {
    /// YAML settings file (`target:` section, all keys optional).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    #[arg(short, long)]
    pub quiet: bool,

    /// covid | covid19 | covid-19 | c19 | influenza | flu | rsv
    #[arg(long)]
    pub disease: Option<Disease>,

    /// latest | preliminary (prelim) | consolidated (consol)
    #[arg(long)]
    pub release: Option<String>,

    /// Jurisdiction table: abbreviation, location, location_name, population.
    #[arg(long)]
    pub locations_file: Option<PathBuf>,

    /// Convert an archived snapshot instead of fetching.
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long, visible_alias = "limit", short = 'l')]
    pub entry_limit: Option<u32>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(long, visible_alias = "export-target", overrides_with = "no_export_truth")]
    pub export_truth: bool,
    #[arg(long, visible_alias = "no-export-target")]
    pub no_export_truth: bool,

    #[arg(long, visible_alias = "target-file")]
    pub truth_file: Option<PathBuf>,

    #[arg(long, overrides_with = "no_export_nhsn")]
    pub export_nhsn: bool,
    #[arg(long)]
    pub no_export_nhsn: bool,

    #[arg(long)]
    pub nhsn_file: Option<PathBuf>,
}

impl TargetArgs {
    pub fn options(&self) -> Result<TargetOptions> {
        let mut o = load_settings(self.config.as_deref())?.target;
        if let Some(v) = self.disease { o.disease = v; }
        if let Some(v) = &self.release { o.release = v.clone(); }
        if let Some(v) = &self.locations_file { o.locations_file = v.clone(); }
        if let Some(v) = &self.input { o.input = Some(v.clone()); }
        if let Some(v) = self.entry_limit { o.entry_limit = v; }
        if let Some(v) = self.timeout_secs { o.timeout_secs = v; }
        if let Some(v) = switch(self.export_truth, self.no_export_truth) { o.export_truth = v; }
        if let Some(v) = &self.truth_file { o.truth_file = v.clone(); }
        if let Some(v) = switch(self.export_nhsn, self.no_export_nhsn) { o.export_nhsn = v; }
        if let Some(v) = &self.nhsn_file { o.nhsn_file = v.clone(); }
        Ok(o)
    }
}

pub fn run_target() -> color_eyre::Result<()> {
    let args = TargetArgs::parse();
    log::init(Verbosity::from_flags(args.verbose, args.quiet));
    let opts = args.options()?;
    if opts.input.is_none() {
        opts.release.parse::<crate::release::Release>()?;
    }

    let client = HttpClient::new(Duration::from_secs(opts.timeout_secs));
    let summary = crate::runner::run_target(&opts, &client)?;

    println!("{} target data from {}: {} rows", summary.disease.name(), summary.source, summary.rows);
    if !summary.unmatched.is_empty() {
        println!("  ignored jurisdictions: {}", summary.unmatched.join(", "));
    }
    for path in &summary.files_written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}
