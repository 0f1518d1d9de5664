// src/release.rs
//! Release resolution: which of the two publication channels to fetch.
//!
//! `latest` asks both metadata endpoints and picks the channel whose
//! `dataUpdatedAt` is strictly newer; on a tie the consolidated release wins,
//! since it is the corrected one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::consts::{UUID_CONSOLIDATED, UUID_PRELIMINARY};
use crate::core::net::Fetcher;
use crate::error::{Error, Result};
use crate::specs::metadata::{parse_metadata, RemoteMetadata};

/// What the user asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Release {
    Latest,
    Preliminary,
    Consolidated,
}

impl FromStr for Release {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latest" => Ok(Release::Latest),
            "preliminary" | "prelim" => Ok(Release::Preliminary),
            "consolidated" | "consol" => Ok(Release::Consolidated),
            _ => Err(Error::InvalidRelease(s!(s))),
        }
    }
}

/// A concrete publication channel. Never "latest".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Preliminary,
    Consolidated,
}

impl Channel {
    pub fn uuid(self) -> &'static str {
        match self {
            Channel::Preliminary => UUID_PRELIMINARY,
            Channel::Consolidated => UUID_CONSOLIDATED,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Channel::Preliminary => "preliminary",
            Channel::Consolidated => "consolidated",
        }
    }

    pub fn data_url(self, api_base: &str) -> String {
        format!("{}/resource/{}.json", api_base.trim_end_matches('/'), self.uuid())
    }

    pub fn metadata_url(self, api_base: &str) -> String {
        format!("{}/api/views/metadata/v1/{}", api_base.trim_end_matches('/'), self.uuid())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedRelease {
    pub channel: Channel,
    pub data_url: String,
    pub metadata: RemoteMetadata,
}

fn fetch_metadata(client: &dyn Fetcher, api_base: &str, channel: Channel) -> Result<RemoteMetadata> {
    let value = client.get_json(&channel.metadata_url(api_base), &[])?;
    parse_metadata(value)
}

fn resolved(api_base: &str, channel: Channel, metadata: RemoteMetadata) -> ResolvedRelease {
    ResolvedRelease { channel, data_url: channel.data_url(api_base), metadata }
}

/// Map a release identifier to an endpoint plus its current metadata.
pub fn resolve(release: &str, client: &dyn Fetcher, api_base: &str) -> Result<ResolvedRelease> {
    let channel = match release.parse::<Release>()? {
        Release::Preliminary => Channel::Preliminary,
        Release::Consolidated => Channel::Consolidated,
        Release::Latest => {
            let prelim = fetch_metadata(client, api_base, Channel::Preliminary)?;
            let consol = fetch_metadata(client, api_base, Channel::Consolidated)?;
            logi!(
                "Latest release check: preliminary as of {}, consolidated as of {}",
                prelim.data_updated_at, consol.data_updated_at
            );
            return Ok(if prelim.as_of > consol.as_of {
                resolved(api_base, Channel::Preliminary, prelim)
            } else {
                resolved(api_base, Channel::Consolidated, consol)
            });
        }
    };
    let metadata = fetch_metadata(client, api_base, channel)?;
    Ok(resolved(api_base, channel, metadata))
}
