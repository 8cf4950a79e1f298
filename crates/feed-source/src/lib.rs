//! # Feed Sources Crate
//!
//! Acquisition of raw feed documents, ahead of parsing and filtering.
//!
//! ## Components
//!
//! ### HTTP Source
//! Fetches a feed URL, following redirects, and keeps the upstream cache
//! headers so they can be passed back to whoever asked for the feed.
//!
//! ### File Source
//! Reads a feed from the local filesystem. Used by the CLI and in tests.
//!
//! ## Example Usage
//!
//! ```ignore
//! use feed_source::{FeedSource, HttpFeedSource};
//!
//! let source = HttpFeedSource::new(Duration::from_secs(10), "feedfilter")?;
//! let fetched = source.fetch("https://www.youtube.com/feeds/videos.xml?channel_id=UC123").await?;
//! let doc = feed_doc::FeedDocument::parse(&fetched.body)?;
//! ```

pub mod file;
pub mod http;

pub use file::FileFeedSource;
pub use http::HttpFeedSource;

use async_trait::async_trait;
use thiserror::Error;

/// Upstream response headers worth forwarding with a filtered feed.
pub const CACHE_HEADERS: [&str; 4] = ["cache-control", "date", "expires", "age"];

/// Errors that can occur while acquiring a feed
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to fetch {location}: {source}")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Fetching {location} returned status {status}")]
    Status { location: String, status: u16 },

    #[error("Failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// A feed body plus the response metadata that travels with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFeed {
    pub location: String,
    pub body: String,
    /// Lower-cased header names from [`CACHE_HEADERS`], in that order.
    pub headers: Vec<(String, String)>,
}

/// Anything that can produce the raw text of a feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Fetch the feed at `location` (a URL or a path, depending on the source).
    async fn fetch(&self, location: &str) -> Result<FetchedFeed, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_headers_are_lowercase() {
        assert!(CACHE_HEADERS.iter().all(|h| h.chars().all(|c| !c.is_ascii_uppercase())));
    }
}
