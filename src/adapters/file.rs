use crate::domain::model::TaxFormPayload;
use crate::domain::ports::PayloadSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Replays a payload saved as JSON, e.g. a captured endpoint response.
#[derive(Debug, Clone)]
pub struct FilePayloadSource {
    path: PathBuf,
}

impl FilePayloadSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PayloadSource for FilePayloadSource {
    async fn fetch(&self) -> Result<TaxFormPayload> {
        tracing::debug!("Reading payload from: {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}
