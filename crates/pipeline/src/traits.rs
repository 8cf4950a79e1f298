//! Core traits for the filtering pipeline.
//!
//! This module defines the EntryPredicate trait that every predicate variant
//! implements, and that the [`Predicate`](crate::Predicate) enum forwards to.

use async_trait::async_trait;
use feed_doc::XmlElement;

/// A single rule deciding whether one feed entry should be removed.
///
/// ## Design Note
/// - `Send + Sync` lets one predicate list be shared by every entry task
/// - Implementations hold no per-call state, so the same instance may be
///   evaluated against many entries at once
/// - The verdict is a plain `bool`: failures inside a predicate resolve to
///   `false` (keep the entry) rather than propagating
#[async_trait]
pub trait EntryPredicate: Send + Sync {
    /// Returns the name of this predicate (for logging/debugging)
    fn name(&self) -> &str;

    /// Decide whether `entry` should be removed from the feed.
    ///
    /// # Arguments
    /// * `feed_url` - The feed being filtered, for diagnostics
    /// * `entry_title` - Display title of the entry, for diagnostics
    /// * `entry` - The entry element itself
    async fn should_remove(&self, feed_url: &str, entry_title: &str, entry: &XmlElement) -> bool;
}
