//! Actuation tests

use serde::Serialize;

use super::RequestNode;

/// An output test the ECU can drive (relay, injector, fan, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActuationTestNode {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub name: String,
    pub start_condition: String,
    pub stop_condition: String,
    pub request_condition: String,
    /// Test duration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_time: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_request: Option<RequestNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_request: Option<RequestNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_request: Option<RequestNode>,
}
