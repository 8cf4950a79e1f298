//! Predicates and per-entry evaluation for feed filtering.
//!
//! This crate provides:
//! - The EntryPredicate trait and the closed [`Predicate`] set (shorts,
//!   country restriction, exclude text, include text)
//! - PredicateRegistry for turning request parameters into predicates
//! - `evaluate` for running a predicate list against one entry
//!
//! ## Architecture
//! Filtering one feed happens in stages:
//! 1. The registry builds an ordered predicate list from the request
//! 2. Each entry is evaluated against every predicate
//! 3. Entries with at least one match are removed from the document
//!
//! Stage 3 and the concurrency around stage 2 live in the server crate.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{FilterRequest, PredicateRegistry, entry_title, evaluate};
//!
//! let registry = PredicateRegistry::new(service, VideoEndpoints::default());
//! let request = FilterRequest::new().with_filter("shorts").with_exclude_term("spoiler");
//! let predicates = registry.build_for(feed_url, &request);
//!
//! for entry in doc.root().entries() {
//!     let title = entry_title(&entry);
//!     let outcome = evaluate(feed_url, entry, title, &predicates).await;
//!     if outcome.is_removed() {
//!         println!("dropping {}", outcome.title);
//!     }
//! }
//! ```

pub mod evaluator;
pub mod predicates;
pub mod registry;
pub mod traits;

// Re-export main types
pub use evaluator::{EvaluationOutcome, NO_TITLE, entry_title, evaluate};
pub use predicates::{
    COUNTRY_RESTRICTED_MARKER, CountryRestrictionPredicate, ExcludeTextPredicate, ID_ELEMENT,
    IdentityError, IncludeTextPredicate, Predicate, ShortsPredicate, VideoIdentity,
};
pub use registry::{FilterKind, FilterRequest, PredicateRegistry};
pub use traits::EntryPredicate;
