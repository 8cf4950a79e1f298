//! Predicate removing videos that are not available in the viewer's region.

use crate::predicates::identity::VideoIdentity;
use crate::traits::EntryPredicate;
use async_trait::async_trait;
use feed_doc::XmlElement;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use video_client::{VideoEndpoints, VideoService};

/// Text the watch page contains when the uploader region-locked the video.
pub const COUNTRY_RESTRICTED_MARKER: &str =
    "The uploader has not made this video available in your country";

/// Removes entries whose watch page says the video is blocked in this region.
///
/// Any failure to get the page counts as "not restricted".
#[derive(Clone)]
pub struct CountryRestrictionPredicate {
    service: Arc<dyn VideoService>,
    endpoints: VideoEndpoints,
}

impl CountryRestrictionPredicate {
    pub fn new(service: Arc<dyn VideoService>, endpoints: VideoEndpoints) -> Self {
        Self { service, endpoints }
    }
}

#[async_trait]
impl EntryPredicate for CountryRestrictionPredicate {
    fn name(&self) -> &str {
        "CountryRestrictionPredicate"
    }

    async fn should_remove(&self, feed_url: &str, entry_title: &str, entry: &XmlElement) -> bool {
        let identity = match VideoIdentity::from_entry(entry) {
            Ok(identity) => identity,
            Err(err) => {
                warn!("RSS URL [{}] [{}] {}", feed_url, entry_title, err);
                return false;
            }
        };
        let video_id = identity.video_id();
        debug!(
            "RSS URL [{}] [{}] found actual video id [{}]",
            feed_url, entry_title, video_id
        );

        let page = match self
            .service
            .fetch_page(&self.endpoints.watch_url(video_id))
            .await
        {
            Ok(page) => page,
            Err(err) => {
                warn!(
                    "RSS URL [{}] [{}] watch page fetch failed for [{}], keeping entry: {}",
                    feed_url, entry_title, video_id, err
                );
                return false;
            }
        };

        if page.contains(COUNTRY_RESTRICTED_MARKER) {
            debug!(
                "RSS URL [{}] [{}] found out of country [{}]",
                feed_url, entry_title, video_id
            );
            true
        } else {
            debug!("RSS URL [{}] [{}] found video [{}]", feed_url, entry_title, video_id);
            false
        }
    }
}

impl fmt::Debug for CountryRestrictionPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountryRestrictionPredicate")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
