// src/core/net.rs
//
// Remote access seam. The pipelines only ever talk to a `Fetcher`; the real one is a
// blocking ureq agent with explicit timeouts, tests plug in canned JSON.

use std::time::Duration;

use serde_json::Value;

use crate::config::consts::USER_AGENT;
use crate::error::{Error, Result};

/// One GET request returning parsed JSON.
pub trait Fetcher {
    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value>;
}

pub struct HttpClient {
    agent: ureq::Agent,
}

impl HttpClient {
    /// `timeout` bounds both connecting and the whole request.
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Fetcher for HttpClient {
    fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        logi!("Requesting from {url}...");
        let mut req = self.agent.get(url);
        for (k, v) in query {
            req = req.query(k, v);
        }

        let resp = match req.call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, resp)) => {
                let text = resp.into_string().unwrap_or_default();
                return Err(Error::remote(url, format!("HTTP {code}: {}", clip(&text, 300))));
            }
            Err(err) => return Err(Error::remote(url, err)),
        };

        // Stream the body: the full dataset is larger than ureq's into_string() cap.
        let value: Value = serde_json::from_reader(resp.into_reader()).map_err(|e| {
            if e.is_io() {
                Error::remote(url, e)
            } else {
                Error::DataParse(format!("{url}: {e}"))
            }
        })?;
        logd!("Request successful: {url}");
        Ok(value)
    }
}

fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
