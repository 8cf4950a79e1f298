//! Serialization of the document tree back to XML text.

use crate::types::{FeedDocument, XmlElement, XmlNode};
use quick_xml::escape::{escape, partial_escape};

const DEFAULT_DECLARATION: &str = "xml version=\"1.0\" encoding=\"UTF-8\"";

impl XmlElement {
    /// Serialize this element and its subtree.
    ///
    /// This is the text that the text predicates match against.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

impl FeedDocument {
    /// Serialize the whole document, adding an XML declaration if the
    /// source had none.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if !self
            .prolog
            .iter()
            .any(|node| matches!(node, XmlNode::Declaration(_)))
        {
            write_node(&mut out, &XmlNode::Declaration(DEFAULT_DECLARATION.to_string()));
            out.push('\n');
        }
        for node in &self.prolog {
            write_node(&mut out, node);
            out.push('\n');
        }
        write_element(&mut out, &self.root);
        for node in &self.epilog {
            out.push('\n');
            write_node(&mut out, node);
        }
        out
    }
}

fn write_element(out: &mut String, element: &XmlElement) {
    out.push('<');
    out.push_str(element.name());
    for (name, value) in element.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
    if element.children().is_empty() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in element.children() {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(element.name());
    out.push('>');
}

fn write_node(out: &mut String, node: &XmlNode) {
    match node {
        XmlNode::Element(element) => write_element(out, element),
        XmlNode::Text(text) => out.push_str(&partial_escape(text.as_str())),
        XmlNode::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        XmlNode::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        XmlNode::ProcessingInstruction(text) | XmlNode::Declaration(text) => {
            out.push_str("<?");
            out.push_str(text);
            out.push_str("?>");
        }
        XmlNode::DocType(text) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(text);
            out.push('>');
        }
    }
}
