//! Filter to remove entries mentioning a term.

use crate::traits::EntryPredicate;
use async_trait::async_trait;
use feed_doc::XmlElement;

/// Removes entries whose serialized markup contains the term.
///
/// The term is stored lower-cased and matched against the lower-cased
/// markup, so matching is case-insensitive on both sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExcludeTextPredicate {
    term: String,
}

impl ExcludeTextPredicate {
    pub fn new(term: &str) -> Self {
        Self {
            term: term.to_lowercase(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub(crate) fn matches(&self, entry: &XmlElement) -> bool {
        entry.to_xml().to_lowercase().contains(&self.term)
    }
}

#[async_trait]
impl EntryPredicate for ExcludeTextPredicate {
    fn name(&self) -> &str {
        "ExcludeTextPredicate"
    }

    async fn should_remove(&self, _feed_url: &str, _entry_title: &str, entry: &XmlElement) -> bool {
        self.matches(entry)
    }
}
