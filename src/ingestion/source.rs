use crate::market::NewsItem;
use async_trait::async_trait;

/// Error types for ingestion operations
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Malformed payload: {0}")]
    Payload(String),
}

impl From<reqwest::Error> for IngestError {
    fn from(error: reqwest::Error) -> Self {
        IngestError::Network(error.to_string())
    }
}

/// A pullable source of tagged news entries
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Source tag stored on every entry it produces
    fn name(&self) -> &str;

    /// Fetch up to `max_items` entries, cleansed and tagged
    async fn fetch(&self, max_items: usize) -> Result<Vec<NewsItem>, IngestError>;
}
