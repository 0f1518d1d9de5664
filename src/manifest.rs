// src/manifest.rs
//! The archive manifest (`metadata.yaml`): an ordered, append-only record of
//! every snapshot the fetch pipeline has written and where it came from.
//!
//! ```yaml
//! last_updated: '2025-01-08T12:01:33-05:00'
//! files:
//! - filename: nhsn_2025-01-08.csv
//!   fetched_on: '2025-01-08T12:01:33-05:00'
//!   data_updated_at: '2025-01-08T15:21:01+0000'
//!   fetch_trigger: manual
//!   release: consolidated
//!   comments: null
//! ```
//!
//! Timestamps are stored exactly as they were produced or received; parsing
//! happens where a decision needs a date.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::core::dates::{local_date, parse_timestamp};
use crate::error::{Error, Result};
use crate::file::write_atomic;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub filename: String,
    pub fetched_on: String,
    pub data_updated_at: String,
    pub fetch_trigger: String,
    pub release: String,
    #[serde(default)]
    pub comments: Option<String>,
}

impl ManifestEntry {
    pub fn as_of(&self) -> std::result::Result<DateTime<FixedOffset>, String> {
        parse_timestamp(&self.data_updated_at)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub last_updated: String,
    #[serde(default)]
    pub files: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn empty(now: &DateTime<FixedOffset>) -> Self {
        Self { last_updated: now.to_rfc3339(), files: Vec::new() }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::ManifestLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&text).map_err(|e| Error::ManifestLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Like [`load`](Self::load), but a missing file becomes an empty manifest.
    /// Nothing is written here; the file appears on the first [`save`](Self::save).
    /// A present-but-corrupt file still fails.
    pub fn load_or_empty(path: &Path, now: &DateTime<FixedOffset>) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }
        logw!("Manifest {} not found; starting an empty one", path.display());
        Ok(Self::empty(now))
    }

    /// Rewrites the whole file (temp file + rename).
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_yaml::to_string(self).map_err(|e| Error::ManifestWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        write_atomic(path, text).map_err(|e| Error::ManifestWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// First entry whose as-of timestamp falls on `date` in `tz`.
    /// Entries with unparseable timestamps never match.
    pub fn find_as_of_date(&self, date: NaiveDate, tz: Tz) -> Option<&ManifestEntry> {
        self.files.iter().find(|e| {
            e.as_of().map(|ts| local_date(&ts, tz) == date).unwrap_or(false)
        })
    }

    pub fn push(&mut self, entry: ManifestEntry, now: &DateTime<FixedOffset>) {
        self.files.push(entry);
        self.last_updated = now.to_rfc3339();
    }
}
