//! Communication setup

use serde::Serialize;

use super::RequestNode;
use crate::protocol::Protocol;

/// A diagnostic function the ECU advertises
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupportedFunction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
    pub description: String,
}

/// How to reach the ECU on the bus
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunicationSetup {
    /// Tester (source) address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<u32>,
    /// Module (destination) address
    pub rx_id: u32,
    /// Bus channel selector
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vss_channel: Option<String>,
    pub protocol: Protocol,
    pub supported_functions: Vec<SupportedFunction>,
    /// Requests that open a session with the ECU
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub start_requests: Vec<RequestNode>,
}

impl std::fmt::Display for CommunicationSetup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tx = self
            .tx_id
            .map(|id| format!("{:#x}", id))
            .unwrap_or_else(|| "None".to_string());
        write!(
            f,
            "tx_id={}, rx_id={:#x}, protocol={}",
            tx, self.rx_id, self.protocol
        )
    }
}
