//! Slip sources
//!
//! The placement API and a local JSON file both return the same payload:
//! `{ "master_slip_id": ..., "slips": [...] }`. Payload validation is shared.

pub mod client;
pub mod file;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::slip::{Slip, SlipBatch};

pub use client::{ApiSource, SlipApiClient};
pub use file::FileSource;

/// Query parameter carrying the master slip id in a dashboard URL
pub const MASTER_SLIP_PARAM: &str = "masterSlipId";

/// Anything that can produce a slip batch
#[async_trait]
pub trait SlipSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    /// Fetch the batch. Single attempt, no retries.
    async fn fetch(&self) -> Result<SlipBatch>;
}

/// Resolve a master slip id from a bare id or a dashboard URL whose query
/// string has `masterSlipId`.
pub fn resolve_master_slip_id(input: &str) -> Result<String> {
    let input = input.trim();
    if input.is_empty() {
        return Err(Error::MissingSlipId);
    }

    match url::Url::parse(input) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https" | "file") => parsed
            .query_pairs()
            .find(|(key, _)| key == MASTER_SLIP_PARAM)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(Error::MissingSlipId),
        // Not a URL: treat as the id itself
        _ => Ok(input.to_string()),
    }
}

/// Validate a raw payload and turn it into a batch.
///
/// `master_slip_id` must be present and truthy (non-empty string or
/// non-zero number) and `slips` must be an array.
pub fn parse_payload(payload: serde_json::Value) -> Result<SlipBatch> {
    let master_slip_id = match payload.get("master_slip_id") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(serde_json::Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => {
            return Err(Error::InvalidPayload(
                "missing master_slip_id".to_string(),
            ))
        }
    };

    let slips = match payload.get("slips") {
        Some(serde_json::Value::Array(items)) => items,
        _ => return Err(Error::InvalidPayload("slips is not an array".to_string())),
    };

    // A record that cannot be read at all is dropped, not the whole batch
    let total = slips.len();
    let slips: Vec<Slip> = slips
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match Slip::deserialize(item) {
            Ok(slip) => Some(slip),
            Err(e) => {
                warn!("Skipping slip #{} of {}: {}", i, master_slip_id, e);
                None
            }
        })
        .collect();

    debug!("Parsed {} of {} slips for {}", slips.len(), total, master_slip_id);
    Ok(SlipBatch {
        master_slip_id,
        slips,
    })
}
