//! Request/response pairs

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;
use crate::pattern::BytePattern;

/// Outbound command and the expected start of its response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestNode {
    /// Command bytes as hex text
    pub request_payload: String,
    /// Expected leading response bytes as hex text, `XX` = any byte
    pub response_prefix: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

impl RequestNode {
    pub fn new(request_payload: impl Into<String>, response_prefix: impl Into<String>) -> Self {
        Self {
            request_payload: request_payload.into(),
            response_prefix: response_prefix.into(),
            index: None,
        }
    }

    /// Decoded command bytes
    pub fn payload(&self) -> Result<Bytes, PatternError> {
        BytePattern::parse_payload(&self.request_payload)
    }

    /// Whether a response frame starts with the expected prefix
    ///
    /// A prefix that cannot be parsed accepts nothing.
    pub fn accepts(&self, response: &[u8]) -> bool {
        BytePattern::parse(&self.response_prefix)
            .map(|p| p.matches_prefix(response))
            .unwrap_or(false)
    }
}
