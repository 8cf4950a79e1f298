//! Parser turning feed XML into a [`FeedDocument`].
//!
//! Built on the pull reader from `quick-xml`. Elements are assembled on a
//! stack and frozen behind an `Arc` when their end tag is seen, so the
//! finished tree never needs interior mutability.

use crate::error::{FeedDocError, Result};
use crate::types::{FeedDocument, XmlElement, XmlNode};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::sync::Arc;

/// Parse a complete document.
///
/// ## Algorithm
/// 1. Pull events from the reader
/// 2. Start tags open a new element on the stack, end tags close it and
///    attach it to its parent (or make it the root)
/// 3. Non-element nodes go to the open element, or to the prolog/epilog
///    when no element is open
/// 4. Whitespace and stray text outside the root are dropped
pub fn parse_document(input: &str) -> Result<FeedDocument> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut prolog = Vec::new();
    let mut epilog = Vec::new();

    loop {
        let event = reader.read_event().map_err(|source| FeedDocError::Xml {
            position: reader.buffer_position() as u64,
            source,
        })?;
        let position = reader.buffer_position() as u64;

        let node = match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start, position)?);
                continue;
            }
            Event::Empty(start) => {
                let element = element_from_start(&start, position)?;
                attach(&mut stack, &mut root, element)?;
                continue;
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element)?;
                }
                continue;
            }
            Event::Text(text) => {
                if stack.is_empty() {
                    continue;
                }
                XmlNode::Text(decode_text(&text, position)?)
            }
            Event::CData(cdata) => XmlNode::CData(lossy(&cdata)),
            Event::Comment(comment) => XmlNode::Comment(lossy(&comment)),
            Event::PI(pi) => XmlNode::ProcessingInstruction(lossy(&pi)),
            Event::Decl(decl) => XmlNode::Declaration(lossy(&decl)),
            Event::DocType(doctype) => XmlNode::DocType(lossy(&doctype).trim().to_string()),
            Event::Eof => break,
        };

        match stack.last_mut() {
            Some(parent) => parent.push(node),
            None if root.is_none() => prolog.push(node),
            None => epilog.push(node),
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedDocError::UnclosedElement {
            name: open.name().to_string(),
        });
    }

    let root = root.ok_or(FeedDocError::MissingRoot)?;
    Ok(FeedDocument {
        prolog,
        root,
        epilog,
    })
}

fn element_from_start(start: &BytesStart<'_>, position: u64) -> Result<XmlElement> {
    let mut element = XmlElement::new(lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| FeedDocError::Xml {
            position,
            source: quick_xml::Error::from(err),
        })?;
        let value = attribute
            .unescape_value()
            .map_err(|source| FeedDocError::Xml { position, source })?
            .into_owned();
        element.push_attribute(lossy(attribute.key.as_ref()), value);
    }
    Ok(element)
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push(XmlNode::Element(Arc::new(element)));
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(FeedDocError::MultipleRoots {
            name: element.name().to_string(),
        }),
    }
}

/// Unescape entity references. Entities other than the five predefined XML
/// ones and character references (`&nbsp;` and friends) are not well-formed
/// XML and fail the parse.
fn decode_text(text: &BytesText<'_>, position: u64) -> Result<String> {
    text.unescape()
        .map(Cow::into_owned)
        .map_err(|source| FeedDocError::Xml { position, source })
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
