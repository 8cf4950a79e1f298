//! Local file feed source.

use crate::{FeedSource, FetchedFeed, SourceError};
use async_trait::async_trait;
use tracing::debug;

/// Reads feeds from disk. The location is a filesystem path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFeedSource;

#[async_trait]
impl FeedSource for FileFeedSource {
    fn name(&self) -> &str {
        "FileFeedSource"
    }

    async fn fetch(&self, location: &str) -> Result<FetchedFeed, SourceError> {
        debug!("Reading feed from {}", location);
        let body = tokio::fs::read_to_string(location)
            .await
            .map_err(|source| SourceError::Io {
                location: location.to_string(),
                source,
            })?;

        Ok(FetchedFeed {
            location: location.to_string(),
            body,
            headers: Vec::new(),
        })
    }
}
