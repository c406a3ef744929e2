//! Telemetry (current data) registers

use gds_conv::{Conversion, ConvertedValue};
use serde::Serialize;

use super::read_be;

/// One telemetry register of an ECU
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentDataNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    /// Display name resolved from the `currentdata` collection
    pub name: String,
    /// Command bytes as hex text
    pub request_payload: String,
    /// Expected response prefix as hex text
    pub response_prefix: String,
    /// Offset of the value store within a response frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_start_position: Option<u32>,
    /// Byte offset within the reassembled value store
    pub position: u32,
    /// Byte width of the raw value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<u64>,
    /// Raw unit index; 0 or absent means "no unit"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_key: Option<u32>,
    /// Unit text resolved from the `unit` messages
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_points: Option<u32>,
    pub conversion: Conversion,
}

impl CurrentDataNode {
    /// Whether the unit should be displayed
    pub fn has_unit(&self) -> bool {
        self.unit_key.unwrap_or(0) != 0
    }

    /// Read this register's raw value out of a response frame
    pub fn extract_raw(&self, frame: &[u8]) -> Option<u64> {
        let offset = self.response_start_position.unwrap_or(0) as usize + self.position as usize;
        read_be(frame, offset, self.size? as usize)
    }

    /// Extract and convert this register's value from a response frame
    pub fn decode(&self, frame: &[u8]) -> Option<ConvertedValue> {
        self.extract_raw(frame).map(|raw| self.conversion.evaluate(raw))
    }

    /// Extract, convert and format with this register's display precision
    pub fn display(&self, frame: &[u8]) -> Option<String> {
        self.extract_raw(frame)
            .map(|raw| self.conversion.format(raw, self.decimal_points))
    }

    /// Whether a raw value lies within the declared bounds
    pub fn in_range(&self, raw: u64) -> bool {
        self.min_value.map_or(true, |min| raw >= min) && self.max_value.map_or(true, |max| raw <= max)
    }
}
