//! Runtime settings for the filtering service.

use std::time::Duration;
use video_client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// How long one entry evaluation may take before the request fails.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(20);

/// Per-request timeout for every outbound HTTP call.
pub const DEFAULT_HTTP_TIMEOUT: Duration = DEFAULT_TIMEOUT;

pub const DEFAULT_USER_AGENT: &str = concat!("feedfilter/", env!("CARGO_PKG_VERSION"));

const MIN_POOL_SIZE: usize = 4;
const POOL_SIZE_PER_CORE: usize = 4;

/// Settings shared by every request the process serves.
///
/// Most evaluation time is spent waiting on the video site, so the pool is
/// sized well above the core count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    pub pool_size: usize,
    pub task_timeout: Duration,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub video_base_url: String,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero is bumped to one so the pool can always make progress.
    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size.max(1);
        self
    }

    pub fn with_task_timeout(mut self, task_timeout: Duration) -> Self {
        self.task_timeout = task_timeout;
        self
    }

    pub fn with_http_timeout(mut self, http_timeout: Duration) -> Self {
        self.http_timeout = http_timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_video_base_url(mut self, video_base_url: impl Into<String>) -> Self {
        self.video_base_url = video_base_url.into();
        self
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            task_timeout: DEFAULT_TASK_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            video_base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Available parallelism times four, never below four.
pub fn default_pool_size() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_mul(POOL_SIZE_PER_CORE)
        .max(MIN_POOL_SIZE)
}
