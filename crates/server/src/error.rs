//! Error types for the filtering service.

use feed_doc::FeedDocError;
use feed_source::SourceError;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

/// Fatal failures while evaluating the entries of one feed.
///
/// Any of these aborts the whole request; no partially filtered feed is
/// produced.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("entry {index} [{title}] was not evaluated within {timeout:?}")]
    TaskTimeout {
        index: usize,
        title: String,
        timeout: Duration,
    },

    #[error("entry {index} [{title}] evaluation failed: {source}")]
    TaskFailed {
        index: usize,
        title: String,
        #[source]
        source: JoinError,
    },

    #[error("worker pool is closed")]
    PoolClosed,
}

/// Everything that can go wrong serving one filtered feed.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Failed to fetch RSS feed {location}")]
    Source {
        location: String,
        #[source]
        source: SourceError,
    },

    #[error("Failed to parse RSS feed {location}")]
    Parse {
        location: String,
        #[source]
        source: FeedDocError,
    },

    #[error("Failed to filter RSS feed {location}")]
    Filter {
        location: String,
        #[source]
        source: FilterError,
    },
}

pub type Result<T> = std::result::Result<T, FilterError>;
