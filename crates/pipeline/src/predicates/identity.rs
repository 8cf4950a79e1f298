//! Video identity extraction shared by the network-backed predicates.
//!
//! Entries in a YouTube feed carry an id of the form `yt:video:<id>`. Only
//! the last segment is needed to build the video URLs.

use feed_doc::XmlElement;
use thiserror::Error;

/// Name of the entry child holding the colon-delimited identifier.
pub const ID_ELEMENT: &str = "id";

const ID_SEGMENTS: usize = 3;

/// Why an entry has no usable video id. Every case is recoverable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("entry has no id in [{entry_xml}]")]
    MissingIdElement { entry_xml: String },

    #[error("entry has no video id in [{id_xml}]")]
    EmptyId { id_xml: String },

    #[error("entry has a malformed id in [{id_xml}]")]
    MalformedId { id_xml: String },
}

/// The platform video id of one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoIdentity {
    video_id: String,
}

impl VideoIdentity {
    /// Extract the identity from the entry's `id` child.
    pub fn from_entry(entry: &XmlElement) -> Result<Self, IdentityError> {
        let id = entry
            .child(ID_ELEMENT)
            .ok_or_else(|| IdentityError::MissingIdElement {
                entry_xml: entry.to_xml(),
            })?;

        let raw = match id.text() {
            Some(text) if !text.is_empty() => text,
            _ => {
                return Err(IdentityError::EmptyId {
                    id_xml: id.to_xml(),
                });
            }
        };

        let segments: Vec<&str> = raw.split(':').collect();
        if segments.len() != ID_SEGMENTS || segments[ID_SEGMENTS - 1].is_empty() {
            return Err(IdentityError::MalformedId {
                id_xml: id.to_xml(),
            });
        }

        Ok(Self {
            video_id: segments[ID_SEGMENTS - 1].to_string(),
        })
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}
