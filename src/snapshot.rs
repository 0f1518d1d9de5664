// src/snapshot.rs
//
// One archived dataset instance: rows keyed by (report date, jurisdiction), one cell per
// data field. Cells stay as the text the remote sent so an archive file round-trips
// exactly; counts are parsed on demand.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::config::consts::STORE_SEP;
use crate::core::dates::parse_date_prefix;
use crate::csv::{parse_rows, rows_to_string, split_header};

#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotRow {
    pub report_date: NaiveDate,
    pub jurisdiction: String,
    /// Parallel to [`SnapshotTable::fields`]. Empty string = missing.
    pub cells: Vec<String>,
}

impl SnapshotRow {
    /// Numeric value of field `idx`; empty, non-numeric or non-finite cells are `None`.
    pub fn count(&self, idx: usize) -> Option<f64> {
        self.cells
            .get(idx)
            .and_then(|c| c.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

/// Invariant: rows sorted by (report date, jurisdiction), keys unique.
#[derive(Clone, Debug, PartialEq)]
pub struct SnapshotTable {
    fields: Vec<String>,
    rows: Vec<SnapshotRow>,
}

impl SnapshotTable {
    /// Sorts the rows; fails on a repeated (report date, jurisdiction) key.
    pub fn new(fields: Vec<String>, mut rows: Vec<SnapshotRow>) -> Result<Self, String> {
        rows.sort_by(|a, b| {
            (a.report_date, a.jurisdiction.as_str()).cmp(&(b.report_date, b.jurisdiction.as_str()))
        });
        if let Some(w) = rows
            .windows(2)
            .find(|w| w[0].report_date == w[1].report_date && w[0].jurisdiction == w[1].jurisdiction)
        {
            return Err(format!(
                "duplicate row for {} / {}",
                w[0].report_date, w[0].jurisdiction
            ));
        }
        for r in &mut rows {
            r.cells.resize(fields.len(), s!());
        }
        Ok(Self { fields, rows })
    }

    pub fn fields(&self) -> &[String] { &self.fields }
    pub fn rows(&self) -> &[SnapshotRow] { &self.rows }
    pub fn len(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn max_report_date(&self) -> Option<NaiveDate> {
        // rows are sorted by date first
        self.rows.last().map(|r| r.report_date)
    }

    /* ---------------- CSV form ---------------- */

    /// Archive form: `<date_col>,<jur_col>,<fields…>` header, one line per row.
    pub fn to_csv(&self, date_col: &str, jur_col: &str) -> String {
        let mut headers = Vec::with_capacity(self.fields.len() + 2);
        headers.push(date_col);
        headers.push(jur_col);
        headers.extend(self.fields.iter().map(String::as_str));

        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                let mut out = Vec::with_capacity(r.cells.len() + 2);
                out.push(r.report_date.format("%Y-%m-%d").to_string());
                out.push(r.jurisdiction.clone());
                out.extend(r.cells.iter().cloned());
                out
            })
            .collect();

        rows_to_string(&headers, &rows, STORE_SEP)
    }

    /// Inverse of [`to_csv`](Self::to_csv). Key columns are found by name; unnamed
    /// columns (a leading index column in older archives) are dropped.
    pub fn from_csv(text: &str, date_col: &str, jur_col: &str) -> Result<Self, String> {
        let (header, body) = split_header(parse_rows(text, STORE_SEP))
            .ok_or_else(|| s!("empty file"))?;

        let date_ix = header.iter().position(|h| h == date_col)
            .ok_or_else(|| format!("missing column `{date_col}`"))?;
        let jur_ix = header.iter().position(|h| h == jur_col)
            .ok_or_else(|| format!("missing column `{jur_col}`"))?;

        let keep: Vec<usize> = (0..header.len())
            .filter(|&i| i != date_ix && i != jur_ix && !header[i].trim().is_empty())
            .collect();
        let fields: Vec<String> = keep.iter().map(|&i| header[i].clone()).collect();

        let mut rows = Vec::with_capacity(body.len());
        for (n, line) in body.iter().enumerate() {
            let cell = |i: usize| line.get(i).map(String::as_str).unwrap_or("");
            let report_date = parse_date_prefix(cell(date_ix))
                .ok_or_else(|| format!("row {}: bad date `{}`", n + 2, cell(date_ix)))?;
            let jurisdiction = cell(jur_ix).trim();
            if jurisdiction.is_empty() {
                return Err(format!("row {}: empty jurisdiction", n + 2));
            }
            rows.push(SnapshotRow {
                report_date,
                jurisdiction: s!(jurisdiction),
                cells: keep.iter().map(|&i| s!(cell(i))).collect(),
            });
        }

        Self::new(fields, rows)
    }
}

/// Keep the first row per key, returning how many were dropped.
pub(crate) fn dedup_keys(rows: &mut Vec<SnapshotRow>) -> usize {
    let before = rows.len();
    let mut seen = HashSet::new();
    rows.retain(|r| seen.insert((r.report_date, r.jurisdiction.clone())));
    before - rows.len()
}
