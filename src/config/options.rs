// src/config/options.rs
//
// Immutable option records for the two pipelines. Built once (defaults → optional
// YAML settings file → CLI overrides) and passed by reference from then on.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::consts::*;
use crate::error::{Error, Result};
use crate::specs::nhsn::Disease;

/// Contents of a `--config` settings file. Every section is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub fetch: FetchOptions,
    pub report: ReportOptions,
    pub target: TargetOptions,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_yaml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    pub dataset_dir: PathBuf,
    pub metadata_filename: String,
    pub api_base: String,
    /// Raw release identifier; validated by the resolver.
    pub release: String,
    pub export: bool,
    pub save_latest: bool,
    pub update_metadata: bool,
    /// Create an empty manifest when none exists instead of failing.
    pub init_metadata: bool,
    pub fetch_trigger: String,
    pub comments: Option<String>,
    /// Override for "now" (reproducible runs). Naive values use `timezone`.
    pub now: Option<String>,
    pub timezone: String,
    pub entry_limit: u32,
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            metadata_filename: s!(METADATA_FILENAME),
            api_base: s!(API_BASE),
            release: s!("latest"),
            export: true,
            save_latest: true,
            update_metadata: true,
            init_metadata: false,
            fetch_trigger: s!(DEFAULT_FETCH_TRIGGER),
            comments: None,
            now: None,
            timezone: s!(DEFAULT_TIMEZONE),
            entry_limit: DEFAULT_ENTRY_LIMIT,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

impl FetchOptions {
    pub fn metadata_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.metadata_filename)
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_tz(&self.timezone)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub dataset_dir: PathBuf,
    pub metadata_filename: String,
    /// Snapshots published before midnight of this date are left out.
    pub minimum_as_of: NaiveDate,
    pub timezone: String,
    pub date_column: String,
    pub jurisdiction_column: String,
    /// Count column per disease; `{}` is replaced by the disease code.
    pub count_column_format: String,
    pub diseases: Vec<Disease>,
    /// Jurisdiction shown when the page opens; its selector entry comes first.
    pub default_jurisdiction: String,
    /// Width of the initial x-axis window, counted back from the latest report date.
    pub window_weeks: u32,
    pub templates_dir: PathBuf,
    pub template_name: String,
    pub assets: Vec<String>,
    pub out_dir: PathBuf,
    /// Override for the build date stamped on the page.
    pub now: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        let (y, m, d) = MINIMUM_AS_OF;
        Self {
            dataset_dir: PathBuf::from(DEFAULT_DATASET_DIR),
            metadata_filename: s!(METADATA_FILENAME),
            minimum_as_of: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
            timezone: s!(DEFAULT_TIMEZONE),
            date_column: s!(DATE_COLUMN),
            jurisdiction_column: s!(JURISDICTION_COLUMN),
            count_column_format: s!(COUNT_COLUMN_FMT),
            diseases: Disease::ALL.to_vec(),
            default_jurisdiction: s!(DEFAULT_JURISDICTION),
            window_weeks: WINDOW_WEEKS,
            templates_dir: PathBuf::from(TEMPLATES_DIR),
            template_name: s!(TEMPLATE_NAME),
            assets: ASSETS.iter().map(|a| s!(*a)).collect(),
            out_dir: PathBuf::from(PAGES_DIR),
            now: None,
        }
    }
}

impl ReportOptions {
    pub fn metadata_path(&self) -> PathBuf {
        self.dataset_dir.join(&self.metadata_filename)
    }

    pub fn template_path(&self) -> PathBuf {
        self.templates_dir.join(&self.template_name)
    }

    pub fn tz(&self) -> Result<Tz> {
        parse_tz(&self.timezone)
    }

    pub fn count_column(&self, disease: Disease) -> String {
        self.count_column_format.replacen("{}", disease.code(), 1)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetOptions {
    pub api_base: String,
    pub release: String,
    pub disease: Disease,
    /// `abbreviation,location,location_name,population` table.
    pub locations_file: PathBuf,
    /// Convert this archived snapshot instead of fetching.
    pub input: Option<PathBuf>,
    pub entry_limit: u32,
    pub timeout_secs: u64,
    pub export_truth: bool,
    pub truth_file: PathBuf,
    /// Also keep the fetched dataset (ignored with `input`).
    pub export_nhsn: bool,
    pub nhsn_file: PathBuf,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            api_base: s!(API_BASE),
            release: s!(TARGET_RELEASE),
            disease: Disease::Flu,
            locations_file: PathBuf::from(LOCATIONS_FILE),
            input: None,
            entry_limit: DEFAULT_ENTRY_LIMIT,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            export_truth: true,
            truth_file: PathBuf::from(TRUTH_FILE),
            export_nhsn: true,
            nhsn_file: PathBuf::from(NHSN_FILE),
        }
    }
}

fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::Config(format!("unknown timezone `{name}`")))
}
