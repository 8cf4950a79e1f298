//! Turns request parameters into an ordered predicate list.

use crate::predicates::{
    CountryRestrictionPredicate, ExcludeTextPredicate, IncludeTextPredicate, Predicate,
    ShortsPredicate,
};
use std::sync::Arc;
use tracing::info;
use video_client::{VideoEndpoints, VideoService};

/// Named filters a caller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Shorts,
    Country,
}

impl FilterKind {
    /// Case-insensitive lookup after trimming; `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("shorts") {
            Some(FilterKind::Shorts)
        } else if name.eq_ignore_ascii_case("country") {
            Some(FilterKind::Country)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKind::Shorts => "shorts",
            FilterKind::Country => "country",
        }
    }
}

/// Everything a caller asked to filter on, before it is turned into
/// predicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterRequest {
    pub filters: Vec<String>,
    pub exclude_terms: Vec<String>,
    pub include_terms: Vec<String>,
}

impl FilterRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(name.into());
        self
    }

    pub fn with_exclude_term(mut self, term: impl Into<String>) -> Self {
        self.exclude_terms.push(term.into());
        self
    }

    pub fn with_include_term(mut self, term: impl Into<String>) -> Self {
        self.include_terms.push(term.into());
        self
    }
}

/// Builds predicate lists that share one video service.
#[derive(Clone)]
pub struct PredicateRegistry {
    service: Arc<dyn VideoService>,
    endpoints: VideoEndpoints,
}

impl PredicateRegistry {
    pub fn new(service: Arc<dyn VideoService>, endpoints: VideoEndpoints) -> Self {
        Self { service, endpoints }
    }

    /// Build the predicates for one feed.
    ///
    /// Order is named filters in request order, then exclude terms, then
    /// include terms. Unknown filter names are skipped. Never fails.
    ///
    /// # Arguments
    /// * `feed_url` - Only used for logging
    /// * `filter_names` - Named filters such as `shorts` or `country`
    /// * `exclude_terms` - Blacklist terms
    /// * `include_terms` - Whitelist terms
    pub fn build_filters<S: AsRef<str>>(
        &self,
        feed_url: &str,
        filter_names: &[S],
        exclude_terms: &[S],
        include_terms: &[S],
    ) -> Vec<Predicate> {
        let mut predicates = Vec::new();

        for name in filter_names {
            let name = name.as_ref();
            match FilterKind::parse(name) {
                Some(FilterKind::Shorts) => {
                    info!("RSS URL [{}] added filter shorts", feed_url);
                    predicates.push(
                        ShortsPredicate::new(self.service.clone(), self.endpoints.clone()).into(),
                    );
                }
                Some(FilterKind::Country) => {
                    info!("RSS URL [{}] added filter country", feed_url);
                    predicates.push(
                        CountryRestrictionPredicate::new(
                            self.service.clone(),
                            self.endpoints.clone(),
                        )
                        .into(),
                    );
                }
                None => info!("RSS URL [{}] ignoring unknown filter [{}]", feed_url, name),
            }
        }

        for term in exclude_terms {
            let predicate = ExcludeTextPredicate::new(term.as_ref());
            info!("RSS URL [{}] added exclude text [{}]", feed_url, predicate.term());
            predicates.push(predicate.into());
        }

        for term in include_terms {
            let predicate = IncludeTextPredicate::new(term.as_ref());
            info!("RSS URL [{}] added include text [{}]", feed_url, predicate.term());
            predicates.push(predicate.into());
        }

        predicates
    }

    pub fn build_for(&self, feed_url: &str, request: &FilterRequest) -> Vec<Predicate> {
        self.build_filters(
            feed_url,
            &request.filters,
            &request.exclude_terms,
            &request.include_terms,
        )
    }
}
