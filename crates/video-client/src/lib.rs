//! Client for the video hosting site consulted by the network-backed
//! predicates.
//!
//! This crate provides:
//! - The [`VideoService`] trait, the seam the pipeline depends on
//! - [`HttpVideoService`], the production implementation over `reqwest`
//! - [`VideoEndpoints`], which builds the per-video URLs
//!
//! Redirects are never followed: the shorts check relies on seeing the
//! redirect itself rather than its target.

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::{Client, redirect};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Default host for the per-video URLs.
pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors that can occur when talking to the video site
#[derive(Error, Debug)]
pub enum VideoClientError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// The two questions the predicates ask of the video site.
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait VideoService: Send + Sync {
    /// Returns `true` when the response for `url` carries no redirect target.
    async fn check_redirect(&self, url: &str) -> Result<bool, VideoClientError>;

    /// Returns the body of the page at `url`.
    async fn fetch_page(&self, url: &str) -> Result<String, VideoClientError>;
}

/// Builds the URLs the predicates probe for a given video id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEndpoints {
    base_url: String,
}

impl VideoEndpoints {
    /// Create endpoints rooted at `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/shorts/<id>`: serves the video directly only for shorts,
    /// everything else redirects to the watch page.
    pub fn shorts_url(&self, video_id: &str) -> String {
        format!("{}/shorts/{}", self.base_url, video_id)
    }

    /// `<base>/watch?v=<id>`
    pub fn watch_url(&self, video_id: &str) -> String {
        format!("{}/watch?v={}", self.base_url, video_id)
    }
}

impl Default for VideoEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// [`VideoService`] backed by a `reqwest` client with redirects disabled.
#[derive(Debug, Clone)]
pub struct HttpVideoService {
    client: Client,
}

impl HttpVideoService {
    /// Build a client with the given per-request timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, VideoClientError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(VideoClientError::ClientBuild)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl VideoService for HttpVideoService {
    async fn check_redirect(&self, url: &str) -> Result<bool, VideoClientError> {
        debug!("HEAD {}", url);
        let response = self.client.head(url).send().await.map_err(|source| {
            error!("HEAD {} failed: {}", url, source);
            VideoClientError::Request {
                url: url.to_string(),
                source,
            }
        })?;

        let redirected = response.headers().contains_key(LOCATION);
        debug!(
            "HEAD {} returned {} (redirect: {})",
            url,
            response.status(),
            redirected
        );
        Ok(!redirected)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, VideoClientError> {
        debug!("GET {}", url);
        let request_error = |source| VideoClientError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            error!("GET {} returned status {}", url, status);
            return Err(VideoClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(request_error)?;
        debug!("GET {} returned {} bytes", url, body.len());
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service() -> HttpVideoService {
        HttpVideoService::new(Duration::from_secs(5), "feedfilter-test").unwrap()
    }

    #[test]
    fn test_endpoints_build_video_urls() {
        let endpoints = VideoEndpoints::new("http://localhost:8080/");

        assert_eq!(endpoints.base_url(), "http://localhost:8080");
        assert_eq!(endpoints.shorts_url("abc"), "http://localhost:8080/shorts/abc");
        assert_eq!(endpoints.watch_url("abc"), "http://localhost:8080/watch?v=abc");
    }

    #[test]
    fn test_default_endpoints_point_at_youtube() {
        assert_eq!(
            VideoEndpoints::default().shorts_url("X"),
            "https://www.youtube.com/shorts/X"
        );
    }

    #[tokio::test]
    async fn test_check_redirect_reports_no_redirect() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/shorts/SHORT1"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let url = format!("{}/shorts/SHORT1", server.uri());
        assert!(service().check_redirect(&url).await.unwrap());
    }

    #[tokio::test]
    async fn test_check_redirect_does_not_follow_location() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/shorts/LONG1"))
            .respond_with(
                ResponseTemplate::new(303).insert_header("location", "/watch?v=LONG1"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = format!("{}/shorts/LONG1", server.uri());
        assert!(!service().check_redirect(&url).await.unwrap());
    }

    #[tokio::test]
    async fn test_fetch_page_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/watch"))
            .and(query_param("v", "ABC"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let url = format!("{}/watch?v=ABC", server.uri());
        assert_eq!(service().fetch_page(&url).await.unwrap(), "<html>ok</html>");
    }

    #[tokio::test]
    async fn test_fetch_page_rejects_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let url = format!("{}/watch?v=ABC", server.uri());
        let err = service().fetch_page(&url).await.unwrap_err();
        assert!(matches!(err, VideoClientError::Status { status: 500, .. }));
    }
}
