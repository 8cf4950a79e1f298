//! Filter to keep only entries mentioning a term.

use crate::predicates::exclude_text::ExcludeTextPredicate;
use crate::traits::EntryPredicate;
use async_trait::async_trait;
use feed_doc::XmlElement;

/// Whitelist: removes every entry whose serialized markup does NOT contain
/// the term.
///
/// Built as the exact complement of [`ExcludeTextPredicate`] for the same
/// term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeTextPredicate {
    inner: ExcludeTextPredicate,
}

impl IncludeTextPredicate {
    pub fn new(term: &str) -> Self {
        Self {
            inner: ExcludeTextPredicate::new(term),
        }
    }

    pub fn term(&self) -> &str {
        self.inner.term()
    }
}

#[async_trait]
impl EntryPredicate for IncludeTextPredicate {
    fn name(&self) -> &str {
        "IncludeTextPredicate"
    }

    async fn should_remove(&self, _feed_url: &str, _entry_title: &str, entry: &XmlElement) -> bool {
        !self.inner.matches(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str) -> XmlElement {
        XmlElement::new("entry").with_element(XmlElement::new("title").with_text(title))
    }

    #[tokio::test]
    async fn test_include_text_removes_non_matching() {
        let include = IncludeTextPredicate::new("Season3");

        assert!(!include.should_remove("f", "t", &entry("Recap of SEASON3")).await);
        assert!(include.should_remove("f", "t", &entry("Season 2 finale")).await);
    }

    #[tokio::test]
    async fn test_include_and_exclude_are_complements() {
        let entries = [entry("Spoiler Warning"), entry("nothing here"), entry("sPoIlEr")];
        for term in ["spoiler", "SPOILER", "Spoiler", "absent"] {
            let include = IncludeTextPredicate::new(term);
            let exclude = ExcludeTextPredicate::new(term);
            for entry in &entries {
                assert_ne!(
                    include.should_remove("f", "t", entry).await,
                    exclude.should_remove("f", "t", entry).await,
                    "term {term} entry {}",
                    entry.to_xml()
                );
            }
        }
    }
}
