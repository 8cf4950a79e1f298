//! Error types for the feed-doc crate.

use thiserror::Error;

/// Errors that can occur while reading a feed document.
///
/// All of these are structural: a document that fails here never reaches
/// the filtering pipeline.
#[derive(Error, Debug)]
pub enum FeedDocError {
    /// The underlying XML reader rejected the input
    #[error("XML error at byte {position}: {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Input contained no element at all
    #[error("Document has no root element")]
    MissingRoot,

    /// A second top-level element appeared after the root was closed
    #[error("Document has more than one root element (found <{name}>)")]
    MultipleRoots { name: String },

    /// Input ended while an element was still open
    #[error("Unexpected end of document inside <{name}>")]
    UnclosedElement { name: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FeedDocError>;
