//! Upstream input event
//!
//! The raw external signal handed to L1 Startle. The reception timestamp is
//! kept as the string the host sent so a malformed value is representable and
//! classified at L1 instead of failing at construction.

use crate::clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Communication-context hints handed to L2 FrameClick.
pub type CommContext = BTreeMap<String, serde_json::Value>;

pub const ROLE_PRIMARY_TEXT: &str = "primary_text_content";
pub const ROLE_ATTACHMENT_REF: &str = "attachment_reference";

pub const MEDIA_TEXT_PLAIN: &str = "text/plain";
pub const MEDIA_URI_LIST: &str = "text/uri-list";

/// One ingested fragment of the input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataComponent {
    pub role_hint: String,
    pub content_handle: String,
    #[serde(default)]
    pub byte_size_hint: Option<u64>,
    #[serde(default)]
    pub media_type_hint: Option<String>,
}

impl DataComponent {
    /// Declared byte size, falling back to the UTF-8 length of the handle.
    pub fn effective_byte_size(&self) -> u64 {
        self.byte_size_hint
            .unwrap_or(self.content_handle.len() as u64)
    }
}

/// The input event contract with the host: reception timestamp, origin hint
/// and an ordered list of data components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub reception_timestamp: String,
    #[serde(default)]
    pub origin_hint: Option<String>,
    #[serde(default)]
    pub data_components: Vec<DataComponent>,
}

impl InputEvent {
    /// Build an event around a single primary text component, stamped now.
    pub fn from_text(text: &str, origin_hint: Option<&str>) -> Self {
        Self {
            reception_timestamp: clock::to_rfc3339_utc(clock::now_utc()),
            origin_hint: origin_hint.map(str::to_string),
            data_components: vec![DataComponent {
                role_hint: ROLE_PRIMARY_TEXT.to_string(),
                content_handle: text.to_string(),
                byte_size_hint: Some(text.len() as u64),
                media_type_hint: Some(MEDIA_TEXT_PLAIN.to_string()),
            }],
        }
    }

    /// Append an attachment-reference component (URI list).
    pub fn with_attachment_ref(mut self, attachment_ref: &str) -> Self {
        self.data_components.push(DataComponent {
            role_hint: ROLE_ATTACHMENT_REF.to_string(),
            content_handle: attachment_ref.to_string(),
            byte_size_hint: Some(attachment_ref.len() as u64),
            media_type_hint: Some(MEDIA_URI_LIST.to_string()),
        });
        self
    }
}
