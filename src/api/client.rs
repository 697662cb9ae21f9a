//! Placement API client

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use super::{parse_payload, SlipSource};
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::slip::SlipBatch;

/// Path of the placement-slip collection under the API base URL
const PLACEMENT_SLIPS_PATH: &str = "api/placement-slips";

pub struct SlipApiClient {
    client: reqwest::Client,
    base_url: String,
    timeout_ms: u64,
}

impl SlipApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// URL of one master slip's placement collection
    pub fn placement_url(&self, master_slip_id: &str) -> Result<url::Url> {
        let mut url = url::Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| Error::Config(format!("Invalid API base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("API base URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(PLACEMENT_SLIPS_PATH.split('/'))
            .push(master_slip_id);
        Ok(url)
    }

    /// Fetch the slips of one master slip
    pub async fn get_placement(&self, master_slip_id: &str) -> Result<SlipBatch> {
        let url = self.placement_url(master_slip_id)?;
        debug!("GET {}", url);

        let resp = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(self.timeout_ms)
            } else {
                Error::from(e)
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Fetch(format!(
                "{} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }

        let payload: serde_json::Value = resp.json().await?;
        let batch = parse_payload(payload)?;
        info!(
            "Fetched {} slips for master slip {}",
            batch.slips.len(),
            batch.master_slip_id
        );
        Ok(batch)
    }

    /// Bind this client to one master slip id
    pub fn source(self, master_slip_id: impl Into<String>) -> ApiSource {
        ApiSource {
            client: self,
            master_slip_id: master_slip_id.into(),
        }
    }
}

/// The placement API as a [`SlipSource`] for a fixed master slip
pub struct ApiSource {
    client: SlipApiClient,
    master_slip_id: String,
}

#[async_trait]
impl SlipSource for ApiSource {
    fn describe(&self) -> String {
        format!("{} (master slip {})", self.client.base_url, self.master_slip_id)
    }

    async fn fetch(&self) -> Result<SlipBatch> {
        self.client.get_placement(&self.master_slip_id).await
    }
}
