// src/error.rs
//! Error taxonomy shared by the pipelines.
//!
//! Every variant here is fatal to the invocation that raised it. Per-file
//! conditions met while loading the archive for a report are *not* errors;
//! they are collected as [`SnapshotSkipped`] values and the load continues.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Release identifier not one of latest / preliminary / consolidated (or aliases).
    #[error("invalid release `{0}`: expected latest, preliminary (prelim) or consolidated (consol)")]
    InvalidRelease(String),

    /// Transport failure, timeout or non-2xx response.
    #[error("request to {url} failed: {reason}")]
    RemoteFetch { url: String, reason: String },

    /// Remote payload did not have the expected shape.
    #[error("could not parse remote data: {0}")]
    DataParse(String),

    #[error("could not load manifest {}: {reason}", path.display())]
    ManifestLoad { path: PathBuf, reason: String },

    #[error("could not write manifest {}: {reason}", path.display())]
    ManifestWrite { path: PathBuf, reason: String },

    /// Every manifest entry was skipped while building the archive table.
    #[error("no snapshots could be loaded ({skipped} skipped)")]
    NoData { skipped: usize },

    #[error("template {}: {reason}", path.display())]
    Template { path: PathBuf, reason: String },

    /// A figure could not be serialized for the page.
    #[error("could not render figure {id}: {reason}")]
    Render { id: String, reason: String },

    /// Locations table for target data could not be read or is malformed.
    #[error("could not load locations {}: {reason}", path.display())]
    Locations { path: PathBuf, reason: String },

    #[error("static asset not found: {}", .0.display())]
    MissingAsset(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::Io { path: path.as_ref().to_path_buf(), source }
    }

    pub fn remote(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        Error::RemoteFetch { url: url.into(), reason: reason.to_string() }
    }
}

/// Why a manifest entry was left out of the archive table.
#[derive(Clone, Debug, PartialEq)]
pub enum SkipReason {
    /// The archive file named by the entry does not exist.
    Missing,
    /// As-of timestamp earlier than the configured cutoff.
    Stale { as_of: NaiveDate, cutoff: NaiveDate },
    /// Another entry with the same calendar as-of date was loaded first.
    Duplicate { as_of: NaiveDate },
    /// The entry's timestamp or the file itself could not be parsed.
    Unparseable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "file does not exist"),
            SkipReason::Stale { as_of, cutoff } => {
                write!(f, "as-of {as_of} is before minimum date {cutoff}")
            }
            SkipReason::Duplicate { as_of } => write!(f, "duplicate as-of date {as_of}"),
            SkipReason::Unparseable(msg) => write!(f, "could not be parsed: {msg}"),
        }
    }
}

/// A non-fatal exclusion recorded while loading snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotSkipped {
    pub filename: String,
    pub reason: SkipReason,
}

impl fmt::Display for SnapshotSkipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filename, self.reason)
    }
}
