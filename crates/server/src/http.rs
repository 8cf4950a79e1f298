//! HTTP surface: `GET /rss` and `GET /health`.

use axum::extract::{RawQuery, State};
use axum::http::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{error, info, warn};
use url::form_urlencoded;

use pipeline::FilterRequest;

use crate::error::ServiceError;
use crate::orchestrator::{FeedFilterOrchestrator, FilteredFeed};

pub const XML_CONTENT_TYPE: &str = "text/xml; charset=UTF-8";

/// Parameters of one `/rss` request.
///
/// `filter`, `excludetext` and `includetext` may be repeated and each value
/// may hold several comma-separated items. Items are lower-cased and empty
/// ones dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RssQuery {
    pub url: Option<String>,
    pub request: FilterRequest,
}

impl RssQuery {
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "url" if parsed.url.is_none() && !value.is_empty() => {
                    parsed.url = Some(value.into_owned())
                }
                "filter" => push_items(&mut parsed.request.filters, &value),
                "excludetext" => push_items(&mut parsed.request.exclude_terms, &value),
                "includetext" => push_items(&mut parsed.request.include_terms, &value),
                _ => {}
            }
        }
        parsed
    }
}

fn push_items(target: &mut Vec<String>, value: &str) {
    target.extend(
        value
            .split(',')
            .filter(|item| !item.is_empty())
            .map(str::to_lowercase),
    );
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        match &self {
            ServiceError::Source { source, .. } => {
                warn!("{}: {}", self, source);
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            ServiceError::Parse { source, .. } => {
                warn!("{}: {}", self, source);
                error_response(StatusCode::BAD_REQUEST, self.to_string())
            }
            ServiceError::Filter { location, source } => {
                error!("Failed to filter RSS feed {}: {}", location, source);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        }
    }
}

fn xml_response(feed: FilteredFeed) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(XML_CONTENT_TYPE));
    for (name, value) in &feed.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => warn!("Dropping unforwardable header {}: {}", name, value),
        }
    }
    (StatusCode::OK, headers, feed.xml).into_response()
}

async fn filter_rss(
    State(orchestrator): State<FeedFilterOrchestrator>,
    RawQuery(query): RawQuery,
) -> Response {
    let query = RssQuery::parse(query.as_deref().unwrap_or_default());
    let Some(url) = query.url else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Missing required parameter url".to_string(),
        );
    };

    info!(
        "RSS URL [{}] filters {:?} exclude {:?} include {:?}",
        url, query.request.filters, query.request.exclude_terms, query.request.include_terms
    );
    match orchestrator.filter_feed(&url, &query.request).await {
        Ok(feed) => xml_response(feed),
        Err(err) => err.into_response(),
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Build the application router around a shared orchestrator.
pub fn router(orchestrator: FeedFilterOrchestrator) -> Router {
    Router::new()
        .route("/rss", get(filter_rss))
        .route("/health", get(health))
        .with_state(orchestrator)
}
