// src/specs/target.rs
//! Hubverse target data: one disease's weekly admissions per location, plus
//! the admission rate per 100k residents.
//!
//! NHSN names jurisdictions by postal abbreviation (`CA`, `USA`, ...); the hub
//! names them by location code (`06`, `US`, ...). The join goes through a
//! locations table with at least these columns:
//!
//! ```text
//! abbreviation,location,location_name,population
//! US,US,United States,334914895
//! CA,06,California,39029342
//! ```
//!
//! Jurisdictions missing from the locations table are dropped with one warning.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::NaiveDate;

use crate::config::consts::STORE_SEP;
use crate::csv::{parse_rows, rows_to_string, split_header};
use crate::error::{Error, Result};
use crate::snapshot::SnapshotTable;

use super::nhsn::Disease;

pub const TARGET_HEADER: [&str; 5] = ["date", "location", "location_name", "value", "weekly_rate"];

const LOCATION_COLUMNS: [&str; 4] = ["abbreviation", "location", "location_name", "population"];
const RATE_PER: f64 = 1e5;

/// NHSN's national jurisdiction and its abbreviation in the locations table.
const NHSN_NATIONAL: &str = "USA";
const HUB_NATIONAL: &str = "US";

#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub abbreviation: String,
    /// Hub location code (FIPS code for states, `US` for the nation).
    pub location: String,
    pub location_name: String,
    pub population: f64,
}

/// Locations keyed by abbreviation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Locations {
    by_abbreviation: BTreeMap<String, Location>,
}

impl Locations {
    /// Columns are found by name; extra columns are ignored. Population must
    /// be a positive number.
    pub fn from_csv(text: &str) -> std::result::Result<Self, String> {
        let (header, body) = split_header(parse_rows(text, STORE_SEP)).ok_or_else(|| s!("empty file"))?;
        let mut ix = [0usize; 4];
        for (slot, name) in ix.iter_mut().zip(LOCATION_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| format!("missing column `{name}`"))?;
        }
        let [abbr_ix, loc_ix, name_ix, pop_ix] = ix;

        let mut by_abbreviation = BTreeMap::new();
        for (n, line) in body.iter().enumerate() {
            let cell = |i: usize| line.get(i).map(|c| c.trim()).unwrap_or("");
            let line_no = n + 2;
            let abbreviation = s!(cell(abbr_ix));
            if abbreviation.is_empty() {
                return Err(format!("line {line_no}: empty abbreviation"));
            }
            let population = cell(pop_ix)
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite() && *p > 0.0)
                .ok_or_else(|| format!("line {line_no}: bad population `{}`", cell(pop_ix)))?;
            let location = Location {
                abbreviation: abbreviation.clone(),
                location: s!(cell(loc_ix)),
                location_name: s!(cell(name_ix)),
                population,
            };
            if by_abbreviation.insert(abbreviation.clone(), location).is_some() {
                return Err(format!("line {line_no}: abbreviation `{abbreviation}` listed twice"));
            }
        }
        Ok(Self { by_abbreviation })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::Locations {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let locations = Self::from_csv(&text).map_err(|reason| Error::Locations {
            path: path.to_path_buf(),
            reason,
        })?;
        logd!("Loaded {} locations from {}", locations.len(), path.display());
        Ok(locations)
    }

    pub fn get(&self, abbreviation: &str) -> Option<&Location> {
        self.by_abbreviation.get(abbreviation)
    }

    pub fn len(&self) -> usize { self.by_abbreviation.len() }
    pub fn is_empty(&self) -> bool { self.by_abbreviation.is_empty() }
}

/// NHSN jurisdiction → locations-table abbreviation.
pub fn hub_abbreviation(jurisdiction: &str) -> &str {
    if jurisdiction == NHSN_NATIONAL { HUB_NATIONAL } else { jurisdiction }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TargetRow {
    pub date: NaiveDate,
    pub location: String,
    pub location_name: String,
    pub value: Option<f64>,
    /// Admissions per 100k residents. Missing when `value` is.
    pub weekly_rate: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TargetData {
    pub disease: Disease,
    /// Sorted by (date, location).
    pub rows: Vec<TargetRow>,
    /// Abbreviations that had no entry in the locations table, sorted.
    pub unmatched: Vec<String>,
}

impl TargetData {
    pub fn to_csv(&self) -> String {
        let fmt = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        let rows: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|r| {
                vec![
                    r.date.format("%Y-%m-%d").to_string(),
                    r.location.clone(),
                    r.location_name.clone(),
                    fmt(r.value),
                    fmt(r.weekly_rate),
                ]
            })
            .collect();
        rows_to_string(&TARGET_HEADER, &rows, STORE_SEP)
    }
}

/// Select `disease`'s admission counts from a snapshot and join them with
/// `locations`. A snapshot without the disease's field is a `DataParse` error.
pub fn make_target_data(table: &SnapshotTable, disease: Disease, locations: &Locations) -> Result<TargetData> {
    logi!("Preparing the target data for {}...", disease.name());
    let field = disease.admissions_field();
    let idx = table
        .field_index(&field)
        .ok_or_else(|| Error::DataParse(format!("snapshot has no `{field}` column")))?;

    let mut rows = Vec::with_capacity(table.len());
    let mut unmatched = BTreeSet::new();
    for row in table.rows() {
        let abbreviation = hub_abbreviation(&row.jurisdiction);
        let Some(loc) = locations.get(abbreviation) else {
            unmatched.insert(s!(abbreviation));
            continue;
        };
        let value = row.count(idx);
        rows.push(TargetRow {
            date: row.report_date,
            location: loc.location.clone(),
            location_name: loc.location_name.clone(),
            value,
            weekly_rate: value.map(|v| v / loc.population * RATE_PER),
        });
    }

    if !unmatched.is_empty() {
        let list: Vec<&str> = unmatched.iter().map(String::as_str).collect();
        logw!(
            "{} jurisdictions not found in the locations data, ignored: {}",
            unmatched.len(),
            list.join(", ")
        );
    }

    rows.sort_by(|a, b| (a.date, a.location.as_str()).cmp(&(b.date, b.location.as_str())));
    Ok(TargetData { disease, rows, unmatched: unmatched.into_iter().collect() })
}
