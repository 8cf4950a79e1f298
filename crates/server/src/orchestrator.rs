//! # Feed Filter Orchestrator
//!
//! This module coordinates filtering of one feed:
//! 1. Fetch the feed body and its cache headers
//! 2. Parse it into a document
//! 3. Build the predicate list from the request
//! 4. Evaluate every entry concurrently on the shared worker pool
//! 5. Remove the matched entries from the root
//! 6. Serialize the document
//!
//! ## Failure Model
//!
//! Predicates never fail; a predicate that cannot reach the video site just
//! keeps the entry. The orchestrator itself fails when an entry task does
//! not finish within the task timeout or dies, and then the whole request
//! fails with no partial output.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use tracing::{debug, error, info, instrument};

use feed_doc::{FeedDocument, NodeRef, XmlElement};
use feed_source::{FeedSource, HttpFeedSource};
use pipeline::{FilterRequest, Predicate, PredicateRegistry, entry_title, evaluate};
use video_client::{HttpVideoService, VideoEndpoints, VideoService};

use crate::config::FilterConfig;
use crate::error::{FilterError, Result, ServiceError};
use crate::pool::WorkerPool;

/// Which entries to drop, plus the titles for logging and summaries.
///
/// Titles are listed once each, in document order, even when several
/// entries share a title.
#[derive(Debug, Clone, Default)]
pub struct RemovalSet {
    pub entries: HashSet<NodeRef>,
    pub removed: Vec<String>,
    pub remaining: Vec<String>,
}

impl RemovalSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, entry: &NodeRef) -> bool {
        self.entries.contains(entry)
    }
}

/// A filtered feed ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct FilteredFeed {
    pub xml: String,
    /// Upstream cache headers to forward unchanged.
    pub headers: Vec<(String, String)>,
    pub removed: Vec<String>,
    pub remaining: Vec<String>,
}

fn push_unique(titles: &mut Vec<String>, title: String) {
    if !titles.contains(&title) {
        titles.push(title);
    }
}

/// Remove every entry in `removal` from the children of `root`.
///
/// Entries that are not children of `root` are ignored. Returns how many
/// children were removed.
pub fn apply_removals(root: &mut XmlElement, removal: &RemovalSet) -> usize {
    removal
        .entries
        .iter()
        .filter(|entry| root.remove_child(entry))
        .count()
}

/// Main orchestrator shared by every request
#[derive(Clone)]
pub struct FeedFilterOrchestrator {
    pool: WorkerPool,
    registry: PredicateRegistry,
    source: Arc<dyn FeedSource>,
    task_timeout: Duration,
}

impl FeedFilterOrchestrator {
    /// Create an orchestrator from already built collaborators
    ///
    /// # Arguments
    /// * `config` - Pool size, task timeout and video base URL
    /// * `service` - Client used by the shorts and country predicates
    /// * `source` - Where feeds are fetched from
    pub fn new(
        config: &FilterConfig,
        service: Arc<dyn VideoService>,
        source: Arc<dyn FeedSource>,
    ) -> Self {
        let registry =
            PredicateRegistry::new(service, VideoEndpoints::new(config.video_base_url.as_str()));
        Self {
            pool: WorkerPool::new(config.pool_size),
            registry,
            source,
            task_timeout: config.task_timeout,
        }
    }

    /// Create an orchestrator that fetches feeds and probes videos over HTTP
    pub fn from_config(config: &FilterConfig) -> anyhow::Result<Self> {
        let service = HttpVideoService::new(config.http_timeout, &config.user_agent)
            .context("Failed to build video client")?;
        let source = HttpFeedSource::new(config.http_timeout, &config.user_agent)
            .context("Failed to build feed client")?;
        Ok(Self::new(config, Arc::new(service), Arc::new(source)))
    }

    /// Use a different feed source, keeping the pool and video client.
    pub fn with_source(mut self, source: Arc<dyn FeedSource>) -> Self {
        self.source = source;
        self
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn registry(&self) -> &PredicateRegistry {
        &self.registry
    }

    /// Evaluate every entry under `root` and collect the ones to remove.
    ///
    /// One task per entry goes to the worker pool. Results are awaited in
    /// submission order, each with its own timeout. On the first timeout or
    /// task fault the remaining tasks are aborted and the error is returned.
    ///
    /// # Returns
    /// The removal set; `root` is not modified.
    #[instrument(skip(self, predicates, root), fields(predicate_count = predicates.len()))]
    pub async fn find_entries_to_remove(
        &self,
        feed_url: &str,
        predicates: &[Predicate],
        root: &XmlElement,
    ) -> Result<RemovalSet> {
        let start_time = Instant::now();
        let shared_url: Arc<str> = Arc::from(feed_url);
        let shared_predicates: Arc<[Predicate]> = Arc::from(predicates);

        let mut pending = Vec::new();
        for entry in root.entries() {
            let title = entry_title(&entry);
            let task_title = title.clone();
            let feed_url = shared_url.clone();
            let predicates = shared_predicates.clone();
            let handle = self.pool.submit(async move {
                evaluate(&feed_url, entry, task_title, &predicates).await
            });
            pending.push((title, handle));
        }
        debug!("RSS URL [{}] submitted {} entries", feed_url, pending.len());

        let mut removal = RemovalSet::default();
        let mut kept = 0;
        let mut pending = pending.into_iter().enumerate();
        while let Some((index, (title, mut handle))) = pending.next() {
            let outcome = match tokio::time::timeout(self.task_timeout, &mut handle).await {
                Ok(Ok(Ok(outcome))) => Ok(outcome),
                Ok(Ok(Err(err))) => Err(err),
                Ok(Err(source)) => Err(FilterError::TaskFailed {
                    index,
                    title,
                    source,
                }),
                Err(_) => {
                    handle.abort();
                    Err(FilterError::TaskTimeout {
                        index,
                        title,
                        timeout: self.task_timeout,
                    })
                }
            };

            let outcome = match outcome {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!("RSS URL [{}] filtering aborted: {}", feed_url, err);
                    for (_, (_, rest)) in pending {
                        rest.abort();
                    }
                    return Err(err);
                }
            };

            match outcome.entry {
                Some(entry) => {
                    removal.entries.insert(entry);
                    push_unique(&mut removal.removed, outcome.title);
                }
                None => {
                    kept += 1;
                    push_unique(&mut removal.remaining, outcome.title);
                }
            }
        }

        info!(
            "RSS URL [{}] removing {} entries {:?}, keeping {} entries {:?} in {:.2?}",
            feed_url,
            removal.len(),
            removal.removed,
            kept,
            removal.remaining,
            start_time.elapsed()
        );
        Ok(removal)
    }

    /// Fetch, filter and re-serialize one feed.
    #[instrument(skip(self, request))]
    pub async fn filter_feed(
        &self,
        location: &str,
        request: &FilterRequest,
    ) -> std::result::Result<FilteredFeed, ServiceError> {
        let fetched = self
            .source
            .fetch(location)
            .await
            .map_err(|source| ServiceError::Source {
                location: location.to_string(),
                source,
            })?;

        let mut doc =
            FeedDocument::parse(&fetched.body).map_err(|source| ServiceError::Parse {
                location: location.to_string(),
                source,
            })?;

        let predicates = self.registry.build_for(location, request);
        let removal = self
            .find_entries_to_remove(location, &predicates, doc.root())
            .await
            .map_err(|source| ServiceError::Filter {
                location: location.to_string(),
                source,
            })?;

        let removed = apply_removals(doc.root_mut(), &removal);
        debug!("RSS URL [{}] removed {} elements", location, removed);

        Ok(FilteredFeed {
            xml: doc.to_xml(),
            headers: fetched.headers,
            removed: removal.removed,
            remaining: removal.remaining,
        })
    }
}
