//! Entry predicates.
//!
//! The set of predicates is closed, so [`Predicate`] is an enum over the
//! concrete rules; each variant also implements
//! [`EntryPredicate`](crate::EntryPredicate) on its own.

pub mod country;
pub mod exclude_text;
pub mod identity;
pub mod include_text;
pub mod shorts;

pub use country::{COUNTRY_RESTRICTED_MARKER, CountryRestrictionPredicate};
pub use exclude_text::ExcludeTextPredicate;
pub use identity::{ID_ELEMENT, IdentityError, VideoIdentity};
pub use include_text::IncludeTextPredicate;
pub use shorts::ShortsPredicate;

use crate::traits::EntryPredicate;
use async_trait::async_trait;
use feed_doc::XmlElement;
use std::fmt;

/// One configured filtering rule.
#[derive(Debug, Clone)]
pub enum Predicate {
    Shorts(ShortsPredicate),
    CountryRestriction(CountryRestrictionPredicate),
    ExcludeText(ExcludeTextPredicate),
    IncludeText(IncludeTextPredicate),
}

impl Predicate {
    fn inner(&self) -> &dyn EntryPredicate {
        match self {
            Predicate::Shorts(p) => p,
            Predicate::CountryRestriction(p) => p,
            Predicate::ExcludeText(p) => p,
            Predicate::IncludeText(p) => p,
        }
    }
}

#[async_trait]
impl EntryPredicate for Predicate {
    fn name(&self) -> &str {
        self.inner().name()
    }

    async fn should_remove(&self, feed_url: &str, entry_title: &str, entry: &XmlElement) -> bool {
        self.inner().should_remove(feed_url, entry_title, entry).await
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Shorts(_) => write!(f, "shorts"),
            Predicate::CountryRestriction(_) => write!(f, "country restriction"),
            Predicate::ExcludeText(p) => write!(f, "exclude text [{}]", p.term()),
            Predicate::IncludeText(p) => write!(f, "include text [{}]", p.term()),
        }
    }
}

impl From<ExcludeTextPredicate> for Predicate {
    fn from(p: ExcludeTextPredicate) -> Self {
        Predicate::ExcludeText(p)
    }
}

impl From<IncludeTextPredicate> for Predicate {
    fn from(p: IncludeTextPredicate) -> Self {
        Predicate::IncludeText(p)
    }
}

impl From<ShortsPredicate> for Predicate {
    fn from(p: ShortsPredicate) -> Self {
        Predicate::Shorts(p)
    }
}

impl From<CountryRestrictionPredicate> for Predicate {
    fn from(p: CountryRestrictionPredicate) -> Self {
        Predicate::CountryRestriction(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_name() {
        let exclude: Predicate = ExcludeTextPredicate::new("Spoiler").into();
        assert_eq!(exclude.to_string(), "exclude text [spoiler]");
        assert_eq!(exclude.name(), "ExcludeTextPredicate");

        let include: Predicate = IncludeTextPredicate::new("season3").into();
        assert_eq!(include.to_string(), "include text [season3]");
        assert_eq!(include.name(), "IncludeTextPredicate");
    }

    #[tokio::test]
    async fn test_enum_delegates_verdict() {
        let entry = XmlElement::new("entry").with_element(XmlElement::new("title").with_text("x"));
        let exclude: Predicate = ExcludeTextPredicate::new("x").into();
        let include: Predicate = IncludeTextPredicate::new("x").into();

        assert!(exclude.should_remove("f", "x", &entry).await);
        assert!(!include.should_remove("f", "x", &entry).await);
    }
}
