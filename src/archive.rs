// src/archive.rs
//
// On-disk snapshot archive: one `nhsn_<YYYY-MM-DD>.csv` per as-of calendar date,
// plus an optional `nhsn_latest.csv` copy of the most recent fetch.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::config::consts::{LATEST_FILENAME, SNAPSHOT_EXT, SNAPSHOT_PREFIX};
use crate::error::Result;
use crate::file::{copy_atomic, write_atomic};
use crate::snapshot::SnapshotTable;

pub fn snapshot_filename(as_of: NaiveDate) -> String {
    format!("{SNAPSHOT_PREFIX}{}.{SNAPSHOT_EXT}", as_of.format("%Y-%m-%d"))
}

pub struct Archive {
    dir: PathBuf,
    date_col: String,
    jur_col: String,
}

impl Archive {
    pub fn new(dir: impl Into<PathBuf>, date_col: &str, jur_col: &str) -> Self {
        Self { dir: dir.into(), date_col: s!(date_col), jur_col: s!(jur_col) }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub fn path_for(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    pub fn latest_path(&self) -> PathBuf {
        self.dir.join(LATEST_FILENAME)
    }

    /// Write a snapshot under `filename`. An existing file is replaced, with a warning.
    /// Returns the path written and whether something was overwritten.
    pub fn write(&self, filename: &str, table: &SnapshotTable) -> Result<(PathBuf, bool)> {
        let path = self.path_for(filename);
        let existed = path.exists();
        if existed {
            logw!("Archive file {} already exists and will be overwritten", path.display());
        }
        logi!("Exporting to {}...", path.display());
        write_atomic(&path, table.to_csv(&self.date_col, &self.jur_col))?;
        Ok((path, existed))
    }

    /// Copy an archived snapshot to the fixed "latest" name.
    pub fn copy_to_latest(&self, src: &Path) -> Result<PathBuf> {
        let dst = self.latest_path();
        logi!("Exporting to {}...", dst.display());
        copy_atomic(src, &dst)?;
        Ok(dst)
    }

    /// Read and validate one archived snapshot. Any failure, I/O included, comes
    /// back as a message: to the report loader an unreadable file is a skipped file.
    pub fn read(&self, filename: &str) -> std::result::Result<SnapshotTable, String> {
        let path = self.path_for(filename);
        let text = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
        SnapshotTable::from_csv(&text, &self.date_col, &self.jur_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_is_dated() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        assert_eq!(snapshot_filename(d), "nhsn_2025-01-08.csv");
    }
}
