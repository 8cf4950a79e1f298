//! Runs a predicate list against a single entry.

use crate::predicates::Predicate;
use crate::traits::EntryPredicate;
use feed_doc::{NodeRef, XmlElement};
use tracing::info;

/// Title used for entries with no `title` child.
pub const NO_TITLE: &str = "No Title";

/// Display title of an entry: the text of its `title` child, or [`NO_TITLE`].
pub fn entry_title(entry: &XmlElement) -> String {
    entry
        .child("title")
        .and_then(|title| title.text())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

/// Result of evaluating one entry.
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// The entry, present only when at least one predicate matched.
    pub entry: Option<NodeRef>,
    pub title: String,
    /// Descriptions of the predicates that voted to remove the entry.
    pub matched: Vec<String>,
}

impl EvaluationOutcome {
    pub fn is_removed(&self) -> bool {
        self.entry.is_some()
    }
}

/// Evaluate every predicate against `entry`.
///
/// `title` is the entry's display title as resolved by [`entry_title`].
/// Predicates run in order and all of them run, even after one has already
/// matched, so that every verdict is logged.
pub async fn evaluate(
    feed_url: &str,
    entry: NodeRef,
    title: String,
    predicates: &[Predicate],
) -> EvaluationOutcome {
    let mut matched = Vec::new();

    for predicate in predicates {
        if predicate.should_remove(feed_url, &title, &entry).await {
            info!(
                "RSS URL [{}] [{}] filtered because of {}",
                feed_url, title, predicate
            );
            matched.push(predicate.to_string());
        } else {
            info!(
                "RSS URL [{}] [{}] not filtered because of {}",
                feed_url, title, predicate
            );
        }
    }

    EvaluationOutcome {
        entry: if matched.is_empty() { None } else { Some(entry) },
        title,
        matched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicates::{ExcludeTextPredicate, IncludeTextPredicate};
    use std::sync::Arc;

    fn node(title: Option<&str>) -> NodeRef {
        let mut entry = XmlElement::new("entry");
        if let Some(title) = title {
            entry = entry.with_element(XmlElement::new("title").with_text(title));
        }
        NodeRef::new(Arc::new(entry))
    }

    #[test]
    fn test_entry_title_fallback() {
        assert_eq!(entry_title(&node(Some("Hello"))), "Hello");
        assert_eq!(entry_title(&node(None)), NO_TITLE);
    }

    #[tokio::test]
    async fn test_no_predicates_keeps_entry() {
        let outcome = evaluate("feed", node(Some("a")), "a".to_string(), &[]).await;
        assert!(!outcome.is_removed());
        assert!(outcome.matched.is_empty());
    }

    #[tokio::test]
    async fn test_all_predicates_run_without_short_circuit() {
        let predicates: Vec<Predicate> = vec![
            ExcludeTextPredicate::new("spoiler").into(),
            ExcludeTextPredicate::new("finale").into(),
            IncludeTextPredicate::new("season3").into(),
        ];
        let entry = node(Some("Spoiler: the finale"));

        let title = entry_title(&entry);
        let outcome = evaluate("feed", entry.clone(), title, &predicates).await;

        assert!(outcome.is_removed());
        assert_eq!(outcome.entry, Some(entry));
        assert_eq!(outcome.title, "Spoiler: the finale");
        assert_eq!(
            outcome.matched,
            vec![
                "exclude text [spoiler]",
                "exclude text [finale]",
                "include text [season3]"
            ]
        );
    }
}
