//! HTTP feed source.

use crate::{CACHE_HEADERS, FeedSource, FetchedFeed, SourceError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Fetches feeds over HTTP(S).
///
/// Unlike the video client this one follows redirects: feed URLs move
/// around and the caller only cares about the final document.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .map_err(SourceError::ClientBuild)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn name(&self) -> &str {
        "HttpFeedSource"
    }

    #[instrument(skip(self))]
    async fn fetch(&self, location: &str) -> Result<FetchedFeed, SourceError> {
        debug!("Fetching feed from {}", location);
        let request_error = |source| SourceError::Request {
            location: location.to_string(),
            source,
        };

        let response = self
            .client
            .get(location)
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "Failed to fetch feed {}: {} {}",
                location,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            );
            return Err(SourceError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let headers = CACHE_HEADERS
            .iter()
            .filter_map(|name| {
                response
                    .headers()
                    .get(*name)
                    .and_then(|value| value.to_str().ok())
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect();

        let body = response.text().await.map_err(request_error)?;
        info!("Fetched feed {} ({} bytes)", location, body.len());

        Ok(FetchedFeed {
            location: location.to_string(),
            body,
            headers,
        })
    }
}
