//! Diagnostic trouble code tables

use serde::Serialize;

use super::RequestNode;

/// One trouble code descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dtc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask: Option<u64>,
    /// Linked freeze-frame record, if the document declares one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freeze_index: Option<u32>,
}

/// Commands to read/clear codes plus the codes they can report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DtcFunction {
    pub requests: Vec<RequestNode>,
    pub dtcs: Vec<Dtc>,
}
