// src/specs/nhsn.rs
//! Weekly Hospital Respiratory Data, jurisdiction level.
//!
//! The API returns a JSON array of flat records, one per (week-ending date,
//! jurisdiction), with every value encoded as a string and null fields omitted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::consts::COUNT_COLUMN_FMT;
use crate::error::{Error, Result};
use crate::snapshot::{dedup_keys, SnapshotRow, SnapshotTable};
use crate::core::dates::parse_date_prefix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Disease {
    #[serde(alias = "covid", alias = "covid19", alias = "covid-19")]
    C19,
    #[serde(alias = "influenza")]
    Flu,
    Rsv,
}

impl Disease {
    pub const ALL: [Disease; 3] = [Disease::C19, Disease::Flu, Disease::Rsv];

    /// 3-letter code used in NHSN field names.
    pub fn code(self) -> &'static str {
        match self {
            Disease::C19 => "c19",
            Disease::Flu => "flu",
            Disease::Rsv => "rsv",
        }
    }

    /// Total new confirmed admissions field, e.g. `totalconfflunewadm`.
    pub fn admissions_field(self) -> String {
        COUNT_COLUMN_FMT.replacen("{}", self.code(), 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            Disease::C19 => "COVID-19",
            Disease::Flu => "Influenza",
            Disease::Rsv => "RSV",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Disease {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c19" | "covid" | "covid19" | "covid-19" => Ok(Disease::C19),
            "flu" | "influenza" => Ok(Disease::Flu),
            "rsv" => Ok(Disease::Rsv),
            other => Err(format!("unknown disease `{other}`")),
        }
    }
}

const TOTAL_SUFFIXES: &[&str] = &["", "adult", "ped"];
const AGE_GROUPS: &[&str] = &[
    "ped0to4", "ped5to17",                                        // Pediatric
    "adult18to49", "adult50to64", "adult65to74", "adult75plus",   // Adults
    "unk",                                                        // Unknown age
];

/// Admission fields archived per snapshot: totals first, then age groups.
pub fn interest_fields() -> Vec<String> {
    let mut out = Vec::with_capacity(Disease::ALL.len() * (TOTAL_SUFFIXES.len() + AGE_GROUPS.len()));
    for d in Disease::ALL {
        for age in TOTAL_SUFFIXES {
            out.push(format!("totalconf{}newadm{age}", d.code()));
        }
    }
    for d in Disease::ALL {
        for age in AGE_GROUPS {
            out.push(format!("numconf{}newadm{age}", d.code()));
        }
    }
    out
}

/// Query parameters for the data endpoint.
pub fn request_query(entry_limit: u32, date_col: &str, jur_col: &str, fields: &[String]) -> Vec<(&'static str, String)> {
    let mut select = vec![s!(date_col), s!(jur_col)];
    select.extend(fields.iter().cloned());
    vec![
        ("$limit", entry_limit.to_string()),
        ("$select", select.join(",")),
    ]
}

fn cell_text(v: Option<&Value>) -> String {
    match v {
        None | Some(Value::Null) => s!(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn parse_record(
    rec: &Map<String, Value>,
    date_col: &str,
    jur_col: &str,
    fields: &[String],
) -> std::result::Result<SnapshotRow, String> {
    let date_txt = cell_text(rec.get(date_col));
    let report_date = parse_date_prefix(&date_txt)
        .ok_or_else(|| format!("bad or missing `{date_col}` (`{date_txt}`)"))?;
    let jurisdiction = cell_text(rec.get(jur_col)).trim().to_string();
    if jurisdiction.is_empty() {
        return Err(format!("missing `{jur_col}`"));
    }
    Ok(SnapshotRow {
        report_date,
        jurisdiction,
        cells: fields.iter().map(|f| cell_text(rec.get(f))).collect(),
    })
}

/// Turn a data-endpoint payload into a table. Bad records are warned about and
/// dropped; a payload with nothing usable is a `DataParse` error.
pub fn parse_records(
    payload: &Value,
    date_col: &str,
    jur_col: &str,
    fields: &[String],
) -> Result<SnapshotTable> {
    let records = payload
        .as_array()
        .ok_or_else(|| Error::DataParse(s!("expected a JSON array of records")))?;
    if records.is_empty() {
        return Err(Error::DataParse(s!("response contained no records")));
    }

    let mut rows = Vec::with_capacity(records.len());
    let mut rejected = 0usize;
    for (i, rec) in records.iter().enumerate() {
        let parsed = rec
            .as_object()
            .ok_or_else(|| s!("not an object"))
            .and_then(|obj| parse_record(obj, date_col, jur_col, fields));
        match parsed {
            Ok(row) => rows.push(row),
            Err(msg) => {
                rejected += 1;
                logw!("Record {i} rejected: {msg}");
            }
        }
    }

    if rows.is_empty() {
        return Err(Error::DataParse(format!("all {} records were malformed", records.len())));
    }
    if rejected > 0 {
        logw!("{rejected} of {} records rejected", records.len());
    }

    let dupes = dedup_keys(&mut rows);
    if dupes > 0 {
        logw!("{dupes} duplicate (date, jurisdiction) records dropped");
    }

    SnapshotTable::new(fields.to_vec(), rows).map_err(Error::DataParse)
}
