//! End-to-end tests for the HTTP surface.
//!
//! The feed is served by wiremock and fetched by the real HTTP source; the
//! video site is replaced by an in-process fake.

use async_trait::async_trait;
use feed_source::HttpFeedSource;
use server::{FeedFilterOrchestrator, FilterConfig, router};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use video_client::{VideoClientError, VideoService};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Channel</title>
  <entry><id>yt:video:ABC</id><title>Regular upload</title></entry>
  <entry><id>yt:video:SHORT1</id><title>Quick clip</title></entry>
  <entry><id>bad-id</id><title>Spoiler Warning</title></entry>
</feed>"#;

struct FakeVideoService {
    delay: Duration,
}

#[async_trait]
impl VideoService for FakeVideoService {
    async fn check_redirect(&self, url: &str) -> Result<bool, VideoClientError> {
        tokio::time::sleep(self.delay).await;
        Ok(url.ends_with("/shorts/SHORT1"))
    }

    async fn fetch_page(&self, _url: &str) -> Result<String, VideoClientError> {
        tokio::time::sleep(self.delay).await;
        Ok(String::new())
    }
}

struct TestServer {
    feeds: MockServer,
    base_url: String,
}

impl TestServer {
    /// Start the feed mock and the filtering server.
    async fn start(delay: Duration, task_timeout: Duration) -> Self {
        let feeds = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/feed.xml"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("cache-control", "max-age=900")
                    .insert_header("x-upstream", "ignored")
                    .set_body_string(FEED),
            )
            .mount(&feeds)
            .await;
        Mock::given(method("GET"))
            .and(path("/broken.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<feed><entry></feed>"))
            .mount(&feeds)
            .await;

        let config = FilterConfig::new()
            .with_pool_size(4)
            .with_task_timeout(task_timeout);
        let source = HttpFeedSource::new(Duration::from_secs(5), "feedfilter-test").unwrap();
        let orchestrator = FeedFilterOrchestrator::new(
            &config,
            Arc::new(FakeVideoService { delay }),
            Arc::new(source),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(orchestrator)).await.unwrap();
        });

        Self {
            feeds,
            base_url: format!("http://{addr}"),
        }
    }

    fn feed_url(&self, name: &str) -> String {
        format!("{}/{}", self.feeds.uri(), name)
    }

    async fn get(&self, query: &str) -> reqwest::Response {
        reqwest::get(format!("{}/rss?{}", self.base_url, query))
            .await
            .unwrap()
    }
}

async fn error_body(response: reqwest::Response) -> serde_json::Value {
    serde_json::from_str(&response.text().await.unwrap()).unwrap()
}

fn encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start(Duration::ZERO, Duration::from_secs(5)).await;

    let response = reqwest::get(format!("{}/health", server.base_url))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_rss_filters_and_forwards_cache_headers() {
    let server = TestServer::start(Duration::ZERO, Duration::from_secs(5)).await;
    let feed = encode(&server.feed_url("feed.xml"));

    let response = server
        .get(&format!("url={feed}&filter=SHORTS&excludetext=spoiler"))
        .await;

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers()["content-type"],
        "text/xml; charset=UTF-8"
    );
    assert_eq!(response.headers()["cache-control"], "max-age=900");
    assert!(response.headers().get("x-upstream").is_none());

    let body = response.text().await.unwrap();
    assert!(body.contains("yt:video:ABC"));
    assert!(!body.contains("yt:video:SHORT1"));
    assert!(!body.contains("bad-id"));
    assert!(body.contains("<title>Channel</title>"));
}

#[tokio::test]
async fn test_rss_without_filters_returns_every_entry() {
    let server = TestServer::start(Duration::ZERO, Duration::from_secs(5)).await;
    let feed = encode(&server.feed_url("feed.xml"));

    let body = server.get(&format!("url={feed}")).await.text().await.unwrap();

    for id in ["yt:video:ABC", "yt:video:SHORT1", "bad-id"] {
        assert!(body.contains(id), "missing {id}");
    }
}

#[tokio::test]
async fn test_missing_url_is_bad_request() {
    let server = TestServer::start(Duration::ZERO, Duration::from_secs(5)).await;

    let response = server.get("filter=shorts").await;

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_fetch_and_parse_failures_are_bad_requests() {
    let server = TestServer::start(Duration::ZERO, Duration::from_secs(5)).await;

    let missing = server.feed_url("missing.xml");
    let response = server.get(&format!("url={}", encode(&missing))).await;
    assert_eq!(response.status(), 400);
    let body = error_body(response).await;
    assert_eq!(body["error"], format!("Failed to fetch RSS feed {missing}"));

    let broken = server.feed_url("broken.xml");
    let response = server.get(&format!("url={}", encode(&broken))).await;
    assert_eq!(response.status(), 400);
    let body = error_body(response).await;
    assert_eq!(body["error"], format!("Failed to parse RSS feed {broken}"));
}

#[tokio::test]
async fn test_task_timeout_is_internal_error() {
    let server = TestServer::start(Duration::from_secs(30), Duration::from_millis(100)).await;
    let feed = encode(&server.feed_url("feed.xml"));

    let response = server.get(&format!("url={feed}&filter=shorts")).await;

    assert_eq!(response.status(), 500);
    let body = error_body(response).await;
    assert_eq!(body["error"], "Internal server error");
}
