// tests/common/mod.rs
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde_json::{json, Value};

use nhsn_archive::core::Fetcher;
use nhsn_archive::error::{Error, Result};
use nhsn_archive::manifest::{Manifest, ManifestEntry};

pub const API: &str = "http://nhsn.test";

/// In-memory remote: canned JSON per URL, every request recorded.
#[derive(Default)]
pub struct FakeFetcher {
    responses: HashMap<String, Value>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), body);
        self
    }

    /// Both metadata documents plus a data payload for each channel.
    pub fn nhsn(prelim_as_of: &str, consol_as_of: &str) -> Self {
        Self::new()
            .with(format!("{API}/api/views/metadata/v1/mpgq-jmmr"), json!({ "dataUpdatedAt": prelim_as_of }))
            .with(format!("{API}/api/views/metadata/v1/ua7e-t2fy"), json!({ "dataUpdatedAt": consol_as_of }))
            .with(format!("{API}/resource/mpgq-jmmr.json"), records(&[("2024-12-28", "USA", "900"), ("2024-12-28", "CA", "90")]))
            .with(format!("{API}/resource/ua7e-t2fy.json"), records(&[("2024-12-28", "USA", "1000"), ("2024-12-28", "CA", "100")]))
    }

    pub fn calls(&self) -> Vec<String> { self.calls.borrow().clone() }
}

impl Fetcher for FakeFetcher {
    fn get_json(&self, url: &str, _query: &[(&str, String)]) -> Result<Value> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| Error::remote(url, "HTTP 404: not found"))
    }
}

/// Remote-shaped records carrying a COVID-19 count.
pub fn records(rows: &[(&str, &str, &str)]) -> Value {
    Value::Array(
        rows.iter()
            .map(|(date, jur, c19)| {
                json!({
                    "weekendingdate": format!("{date}T00:00:00.000"),
                    "jurisdiction": jur,
                    "totalconfc19newadm": c19,
                })
            })
            .collect(),
    )
}

pub fn entry(filename: &str, data_updated_at: &str) -> ManifestEntry {
    ManifestEntry {
        filename: filename.to_string(),
        fetched_on: "2025-01-08T12:00:00-05:00".to_string(),
        data_updated_at: data_updated_at.to_string(),
        fetch_trigger: "manual".to_string(),
        release: "consolidated".to_string(),
        comments: None,
    }
}

pub fn write_manifest(dir: &Path, entries: Vec<ManifestEntry>) {
    let manifest = Manifest { last_updated: "2025-01-08T12:00:00-05:00".to_string(), files: entries };
    manifest.save(&dir.join("metadata.yaml")).unwrap();
}

/// Archive CSV with one flu column: (report date, jurisdiction, count).
pub fn write_snapshot(dir: &Path, filename: &str, rows: &[(&str, &str, &str)]) {
    let mut text = String::from("weekendingdate,jurisdiction,totalconfflunewadm\n");
    for (date, jur, v) in rows {
        text.push_str(&format!("{date},{jur},{v}\n"));
    }
    fs::write(dir.join(filename), text).unwrap();
}

/// Snapshot of both USA and CA for four report dates, counts offset by `bump`.
pub fn write_usa_ca_snapshot(dir: &Path, filename: &str, bump: u32) {
    let mut rows = Vec::new();
    for date in ["2024-12-01", "2024-12-08", "2024-12-15", "2024-12-22"] {
        rows.push((date.to_string(), "USA", (100 + bump).to_string()));
        rows.push((date.to_string(), "CA", (10 + bump).to_string()));
    }
    let borrowed: Vec<(&str, &str, &str)> = rows.iter().map(|(d, j, v)| (d.as_str(), *j, v.as_str())).collect();
    write_snapshot(dir, filename, &borrowed);
}
