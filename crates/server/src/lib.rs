//! Server crate for the feed filtering service.
//!
//! This crate contains the orchestrator that evaluates feed entries on a
//! shared worker pool, and the HTTP router that exposes it.

pub mod config;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod pool;

pub use config::FilterConfig;
pub use error::{FilterError, ServiceError};
pub use http::{RssQuery, router};
pub use orchestrator::{FeedFilterOrchestrator, FilteredFeed, RemovalSet, apply_removals};
pub use pool::WorkerPool;
