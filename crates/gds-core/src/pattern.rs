//! Hex byte strings with wildcard positions
//!
//! Request payloads and expected response prefixes are written as hex text,
//! optionally space separated. In response prefixes `XX` stands for any byte.

use std::fmt;

use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::error::PatternError;

/// Sequence of concrete or wildcard bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytePattern {
    bytes: Vec<Option<u8>>,
}

impl BytePattern {
    /// Parse hex text such as `"61 01 XX"`, `"6101xx"` or `"0x6101"`
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact
            .strip_prefix("0x")
            .or_else(|| compact.strip_prefix("0X"))
            .unwrap_or(&compact);

        if compact.len() % 2 != 0 {
            return Err(PatternError::OddLength(input.to_string()));
        }

        let mut bytes = Vec::with_capacity(compact.len() / 2);
        for chunk in compact.as_bytes().chunks(2) {
            if chunk.eq_ignore_ascii_case(b"xx") {
                bytes.push(None);
                continue;
            }
            let mut byte = [0u8; 1];
            hex::decode_to_slice(chunk, &mut byte).map_err(|_| PatternError::InvalidByte {
                byte: String::from_utf8_lossy(chunk).into_owned(),
                input: input.to_string(),
            })?;
            bytes.push(Some(byte[0]));
        }

        Ok(Self { bytes })
    }

    /// Parse hex text that must not contain wildcards
    pub fn parse_payload(input: &str) -> Result<Bytes, PatternError> {
        Self::parse(input)?
            .to_bytes()
            .ok_or_else(|| PatternError::Wildcard(input.to_string()))
    }

    /// Number of byte positions
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether `data` starts with this pattern
    pub fn matches_prefix(&self, data: &[u8]) -> bool {
        data.len() >= self.bytes.len()
            && self
                .bytes
                .iter()
                .zip(data)
                .all(|(expected, actual)| expected.map_or(true, |b| b == *actual))
    }

    /// Concrete bytes, `None` if any position is a wildcard
    pub fn to_bytes(&self) -> Option<Bytes> {
        self.bytes
            .iter()
            .copied()
            .collect::<Option<Vec<u8>>>()
            .map(Bytes::from)
    }
}

impl fmt::Display for BytePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .bytes
            .iter()
            .map(|b| match b {
                Some(b) => format!("{:02X}", b),
                None => "XX".to_string(),
            })
            .collect();
        f.write_str(&parts.join(" "))
    }
}

impl Serialize for BytePattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
