//! Predicate removing short-form videos.
//!
//! The video site serves `/shorts/<id>` directly only when the video really
//! is a short; any other video gets redirected to its watch page. So a HEAD
//! on the shorts URL that comes back without a `Location` header means the
//! entry is a short.

use crate::predicates::identity::VideoIdentity;
use crate::traits::EntryPredicate;
use async_trait::async_trait;
use feed_doc::XmlElement;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use video_client::{VideoEndpoints, VideoService};

/// Removes entries that are short-form videos.
///
/// ## Algorithm
/// 1. If any `link` of the entry already points at `/shorts/`, remove it
/// 2. Extract the video id; keep the entry if it is malformed
/// 3. Probe `<base>/shorts/<id>` and remove the entry when it is not
///    redirected
/// 4. Keep the entry if the probe fails
#[derive(Clone)]
pub struct ShortsPredicate {
    service: Arc<dyn VideoService>,
    endpoints: VideoEndpoints,
}

impl ShortsPredicate {
    pub fn new(service: Arc<dyn VideoService>, endpoints: VideoEndpoints) -> Self {
        Self { service, endpoints }
    }
}

fn shorts_link(entry: &XmlElement) -> Option<&str> {
    entry
        .children_named("link")
        .filter_map(|link| link.attribute("href"))
        .find(|href| href.contains("/shorts/"))
}

#[async_trait]
impl EntryPredicate for ShortsPredicate {
    fn name(&self) -> &str {
        "ShortsPredicate"
    }

    async fn should_remove(&self, feed_url: &str, entry_title: &str, entry: &XmlElement) -> bool {
        if let Some(href) = shorts_link(entry) {
            debug!("RSS URL [{}] [{}] found short link [{}]", feed_url, entry_title, href);
            return true;
        }

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

        match self
            .service
            .check_redirect(&self.endpoints.shorts_url(video_id))
            .await
        {
            Ok(true) => {
                debug!("RSS URL [{}] [{}] found short [{}]", feed_url, entry_title, video_id);
                true
            }
            Ok(false) => {
                debug!("RSS URL [{}] [{}] found video [{}]", feed_url, entry_title, video_id);
                false
            }
            Err(err) => {
                warn!(
                    "RSS URL [{}] [{}] shorts check failed for [{}], keeping entry: {}",
                    feed_url, entry_title, video_id, err
                );
                false
            }
        }
    }
}

impl fmt::Debug for ShortsPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortsPredicate")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}
