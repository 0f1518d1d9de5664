// src/specs/metadata.rs
//! Metadata documents (`/api/views/metadata/v1/<uuid>`). Only `dataUpdatedAt` is used.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

use crate::core::dates::parse_timestamp;
use crate::error::{Error, Result};

#[derive(Deserialize)]
struct RawMetadata {
    #[serde(rename = "dataUpdatedAt")]
    data_updated_at: String,
}

/// What the remote says about one release's current data.
#[derive(Clone, Debug, PartialEq)]
pub struct RemoteMetadata {
    /// Timestamp string exactly as published; this is what the manifest records.
    pub data_updated_at: String,
    pub as_of: DateTime<FixedOffset>,
}

pub fn parse_metadata(value: Value) -> Result<RemoteMetadata> {
    let raw: RawMetadata = serde_json::from_value(value)
        .map_err(|e| Error::DataParse(format!("metadata document: {e}")))?;
    let as_of = parse_timestamp(&raw.data_updated_at)
        .map_err(|e| Error::DataParse(format!("metadata dataUpdatedAt: {e}")))?;
    Ok(RemoteMetadata { data_updated_at: raw.data_updated_at, as_of })
}
