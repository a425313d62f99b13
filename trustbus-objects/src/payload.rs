use bytes::Bytes;
use serde::{Deserialize, Serialize};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// Payload type of opaque binary content.
pub const PO_BINARY: u32 = 0x0100_0000;

/// Payload type of UTF-8 text.
pub const PO_TEXT: u32 = 0x4000_0000;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Application content carried by a message. The core never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadObject {
    /// The type number of the payload.
    pub po_num: u32,

    /// The content.
    pub content: Bytes,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl PayloadObject {
    /// Creates a payload object.
    pub fn new(po_num: u32, content: impl Into<Bytes>) -> Self {
        Self {
            po_num,
            content: content.into(),
        }
    }

    /// Creates a text payload.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(PO_TEXT, content.into())
    }
}
