//! Core document types for parsed feeds.
//!
//! The tree is split in two on purpose of ownership:
//! - The root element is owned by [`FeedDocument`] and is the only mutable
//!   element in the tree.
//! - Every nested element sits behind an `Arc`, so an entry can be handed to
//!   a worker task and read there while the document stays with the caller.

use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Local name of the elements the filtering pipeline operates on.
pub const ENTRY_ELEMENT: &str = "entry";

// =============================================================================
// Nodes
// =============================================================================

/// One node in the document tree.
///
/// Text and CDATA hold decoded content; comments, processing instructions,
/// doctype and declaration hold their raw inner text.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(Arc<XmlElement>),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
    Declaration(String),
}

impl XmlNode {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Arc<XmlElement>> {
        match self {
            XmlNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element with its qualified name, attributes (in document order) and
/// child nodes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute (builder pattern).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append a child element (builder pattern).
    pub fn with_element(mut self, child: XmlElement) -> Self {
        self.push(XmlNode::Element(Arc::new(child)));
        self
    }

    /// Append a text node (builder pattern).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.push(XmlNode::Text(text.into()));
        self
    }

    pub(crate) fn push(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    pub(crate) fn push_attribute(&mut self, name: String, value: String) {
        self.attributes.push((name, value));
    }

    /// Qualified name, including any namespace prefix (`yt:videoId`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix (`videoId`).
    pub fn local_name(&self) -> &str {
        self.name
            .rsplit_once(':')
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Value of the first attribute with this qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn children(&self) -> &[XmlNode] {
        &self.children
    }

    /// Child elements, skipping text and other node kinds.
    pub fn child_elements(&self) -> impl Iterator<Item = &Arc<XmlElement>> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    /// First child element with this local name, whatever its prefix.
    pub fn child(&self, name: &str) -> Option<&Arc<XmlElement>> {
        self.child_elements()
            .find(|element| element.local_name() == name)
    }

    /// All child elements with this local name, whatever their prefix.
    pub fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<XmlElement>> + 'a {
        self.child_elements()
            .filter(move |element| element.local_name() == name)
    }

    /// Concatenated text and CDATA content of the direct children.
    ///
    /// Returns `None` when the element has no text-bearing children at all,
    /// and `Some("")` only for explicitly empty text.
    pub fn text(&self) -> Option<String> {
        let mut parts = self
            .children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) | XmlNode::CData(text) => Some(text.as_str()),
                _ => None,
            })
            .peekable();
        parts.peek()?;
        Some(parts.collect())
    }

    /// Handles to the child elements whose local name is `entry`, in
    /// document order.
    pub fn entries(&self) -> Vec<NodeRef> {
        self.child_elements()
            .filter(|element| element.local_name() == ENTRY_ELEMENT)
            .cloned()
            .map(NodeRef)
            .collect()
    }

    /// Remove the child element identified by `target`.
    ///
    /// Identity is by reference, not by content. Returns `false` if `target`
    /// is not a direct child of this element.
    pub fn remove_child(&mut self, target: &NodeRef) -> bool {
        let before = self.children.len();
        self.children.retain(|node| match node {
            XmlNode::Element(element) => !Arc::ptr_eq(element, &target.0),
            _ => true,
        });
        before != self.children.len()
    }
}

// =============================================================================
// NodeRef
// =============================================================================

/// Shared handle to an element, compared and hashed by identity.
///
/// Two entries with identical markup are still two different `NodeRef`s,
/// which is what the removal set needs since titles and even whole entries
/// may repeat within a feed.
#[derive(Debug, Clone)]
pub struct NodeRef(Arc<XmlElement>);

impl NodeRef {
    pub fn new(element: Arc<XmlElement>) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Arc<XmlElement> {
        &self.0
    }
}

impl Deref for NodeRef {
    type Target = XmlElement;

    fn deref(&self) -> &XmlElement {
        &self.0
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

// =============================================================================
// FeedDocument
// =============================================================================

/// A parsed feed: everything before the root, the root itself, and anything
/// trailing it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedDocument {
    pub(crate) prolog: Vec<XmlNode>,
    pub(crate) root: XmlElement,
    pub(crate) epilog: Vec<XmlNode>,
}

impl FeedDocument {
    /// Wrap a root element into a document with no prolog.
    pub fn new(root: XmlElement) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut XmlElement {
        &mut self.root
    }

    pub fn prolog(&self) -> &[XmlNode] {
        &self.prolog
    }
}
