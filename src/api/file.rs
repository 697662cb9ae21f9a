//! Slip batch read from a local JSON file

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use super::{parse_payload, SlipSource};
use crate::error::{Error, Result};
use crate::slip::SlipBatch;

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SlipSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<SlipBatch> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::Io(format!("{}: {}", self.path.display(), e)))?;
        let payload: serde_json::Value = serde_json::from_str(&raw)?;
        let batch = parse_payload(payload)?;
        info!(
            "Loaded {} slips for master slip {} from {}",
            batch.slips.len(),
            batch.master_slip_id,
            self.path.display()
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_payload(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_fetch_from_file() {
        let file = write_payload(
            r#"{"master_slip_id": "M-3", "slips": [
                {"slip_id": "s1", "risk_category": "low", "total_odds": 1.8, "stake": 5},
                {"slip_id": "s2", "risk_category": "HIGH", "total_odds": 7.2}
            ]}"#,
        );

        let batch = FileSource::new(file.path()).fetch().await.unwrap();
        assert_eq!(batch.master_slip_id, "M-3");
        assert_eq!(batch.slips.len(), 2);
        assert_eq!(batch.slips[1].id, "s2");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = FileSource::new("/nonexistent/slips.json");
        let err = tokio_test::block_on(source.fetch()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn test_malformed_json() {
        let file = write_payload("{not json");
        let err = FileSource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, Error::Deserialization(_)));
    }

    #[tokio::test]
    async fn test_invalid_shape() {
        let file = write_payload(r#"{"master_slip_id": "M", "slips": null}"#);
        let err = FileSource::new(file.path()).fetch().await.unwrap_err();
        assert!(matches!(err, Error::InvalidPayload(_)));
    }
}
