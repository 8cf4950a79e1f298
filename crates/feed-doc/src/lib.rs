//! # Feed Document Crate
//!
//! In-memory XML tree for Atom/RSS feeds, built for the filtering pipeline.
//!
//! ## Main Components
//!
//! - **types**: The node tree ([`FeedDocument`], [`XmlElement`], [`XmlNode`])
//!   and [`NodeRef`], an identity handle used to mark entries for removal
//! - **parser**: Build a document from XML text
//! - **writer**: Serialize elements and documents back to XML
//! - **error**: Error types for malformed documents
//!
//! ## Example Usage
//!
//! ```ignore
//! use feed_doc::FeedDocument;
//!
//! let mut doc = FeedDocument::parse(&body)?;
//! for entry in doc.root().entries() {
//!     println!("{:?}", entry.child("title").and_then(|t| t.text()));
//! }
//! let first = doc.root().entries().remove(0);
//! doc.root_mut().remove_child(&first);
//! let xml = doc.to_xml();
//! ```

pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use error::{FeedDocError, Result};
pub use types::{ENTRY_ELEMENT, FeedDocument, NodeRef, XmlElement, XmlNode};

impl FeedDocument {
    /// Parse a feed from its XML text.
    pub fn parse(input: &str) -> Result<Self> {
        parser::parse_document(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YOUTUBE_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns:yt="http://www.youtube.com/xml/schemas/2015" xmlns:media="http://search.yahoo.com/mrss/" xmlns="http://www.w3.org/2005/Atom">
 <link rel="self" href="http://www.youtube.com/feeds/videos.xml?channel_id=UC123"/>
 <id>yt:channel:UC123</id>
 <title>Some Channel</title>
 <entry>
  <id>yt:video:ABC</id>
  <yt:videoId>ABC</yt:videoId>
  <title>First</title>
 </entry>
 <entry>
  <id>yt:video:DEF</id>
  <yt:videoId>DEF</yt:videoId>
  <title>Second</title>
 </entry>
</feed>"#;

    #[test]
    fn test_entries_are_root_children_named_entry() {
        let doc = FeedDocument::parse(YOUTUBE_FEED).unwrap();
        let entries = doc.root().entries();

        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].child("title").and_then(|t| t.text()).as_deref(),
            Some("First")
        );
        assert_eq!(
            entries[1].child("videoId").and_then(|t| t.text()).as_deref(),
            Some("DEF")
        );
    }

    #[test]
    fn test_local_name_strips_prefix() {
        let doc = FeedDocument::parse(YOUTUBE_FEED).unwrap();
        let entries = doc.root().entries();
        let video_id = entries[0].child("videoId").unwrap();

        assert_eq!(video_id.name(), "yt:videoId");
        assert_eq!(video_id.local_name(), "videoId");
    }

    #[test]
    fn test_prefixed_feed_children_found_by_local_name() {
        let doc = FeedDocument::parse(
            r#"<atom:feed xmlns:atom="http://www.w3.org/2005/Atom">
 <atom:title>Channel</atom:title>
 <atom:entry>
  <atom:id>yt:video:SHORT1</atom:id>
  <atom:title>Quick clip</atom:title>
  <atom:link rel="alternate" href="https://www.youtube.com/watch?v=SHORT1"/>
  <atom:link rel="related" href="https://www.youtube.com/shorts/SHORT1"/>
 </atom:entry>
</atom:feed>"#,
        )
        .unwrap();
        let entries = doc.root().entries();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(
            entry.child("id").and_then(|id| id.text()).as_deref(),
            Some("yt:video:SHORT1")
        );
        assert_eq!(
            entry.child("title").and_then(|t| t.text()).as_deref(),
            Some("Quick clip")
        );
        assert_eq!(entry.children_named("link").count(), 2);
        assert_eq!(entry.child("title").unwrap().name(), "atom:title");
    }

    #[test]
    fn test_remove_child_by_identity() {
        let mut doc = FeedDocument::parse(YOUTUBE_FEED).unwrap();
        let entries = doc.root().entries();

        assert!(doc.root_mut().remove_child(&entries[0]));
        assert!(!doc.root_mut().remove_child(&entries[0]));

        let remaining = doc.root().entries();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0], entries[1]);
        // Channel-level elements are untouched
        assert!(doc.root().child("title").is_some());
        assert!(doc.root().child("link").is_some());
    }

    #[test]
    fn test_identical_entries_are_distinct_refs() {
        let doc = FeedDocument::parse(
            "<feed><entry><title>Same</title></entry><entry><title>Same</title></entry></feed>",
        )
        .unwrap();
        let entries = doc.root().entries();

        assert_eq!(entries[0].element(), entries[1].element());
        assert_ne!(entries[0], entries[1]);
    }

    #[test]
    fn test_text_absent_without_text_nodes() {
        let doc = FeedDocument::parse("<feed><id/><name>x</name></feed>").unwrap();
        let root = doc.root();

        assert_eq!(root.child("id").unwrap().text(), None);
        assert_eq!(root.child("name").unwrap().text().as_deref(), Some("x"));
    }

    #[test]
    fn test_to_xml_after_removal_keeps_siblings_in_order() {
        let mut doc = FeedDocument::parse(
            "<feed><title>T</title><entry><id>1</id></entry><entry><id>2</id></entry><entry><id>3</id></entry></feed>",
        )
        .unwrap();
        let entries = doc.root().entries();
        doc.root_mut().remove_child(&entries[1]);

        assert_eq!(
            doc.to_xml(),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<feed><title>T</title><entry><id>1</id></entry><entry><id>3</id></entry></feed>"
        );
    }
}
