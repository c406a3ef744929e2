//! Mock transport for testing and offline runs

use std::time::Duration;

use bytes::Bytes;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;

use super::{BusTransport, TransportError};
use crate::error::{DocumentError, PatternError};
use crate::pattern::BytePattern;
use crate::protocol::Protocol;

/// One scripted exchange as written in a responses file
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptEntry {
    /// Request bytes as hex text
    pub request: String,
    /// Response bytes as hex text
    #[serde(default)]
    pub response: Option<String>,
    /// Answer this request with a timeout instead
    #[serde(default)]
    pub timeout: bool,
    /// Answer this request by dropping the connection
    #[serde(default)]
    pub closed: bool,
}

#[derive(Debug, Clone)]
enum Reply {
    Frame(Vec<u8>),
    Timeout,
    Closed,
}

/// Mock transport answering from a request → response table
///
/// Requests are matched exactly first, then by prefix. Unknown requests
/// time out, as a silent bus would.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: RwLock<Vec<(Vec<u8>, Reply)>>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a YAML list of [`ScriptEntry`]
    pub fn from_script(yaml: &str) -> Result<Self, DocumentError> {
        let entries: Vec<ScriptEntry> = serde_yaml::from_str(yaml)?;
        let transport = Self::new();
        for entry in entries {
            transport.add_entry(&entry)?;
        }
        Ok(transport)
    }

    /// Add a mock response for a given request
    pub fn add_response(&self, request: Vec<u8>, response: Vec<u8>) {
        self.replies.write().push((request, Reply::Frame(response)));
    }

    /// Make a given request time out
    pub fn add_timeout(&self, request: Vec<u8>) {
        self.replies.write().push((request, Reply::Timeout));
    }

    /// Make a given request fail with a closed connection
    pub fn add_closed(&self, request: Vec<u8>) {
        self.replies.write().push((request, Reply::Closed));
    }

    /// Add a scripted entry written as hex text
    pub fn add_entry(&self, entry: &ScriptEntry) -> Result<(), PatternError> {
        let request = BytePattern::parse_payload(&entry.request)?.to_vec();
        match (&entry.response, entry.timeout) {
            _ if entry.closed => self.add_closed(request),
            (Some(response), false) => {
                let response = BytePattern::parse_payload(response)?.to_vec();
                self.add_response(request, response);
            }
            _ => self.add_timeout(request),
        }
        Ok(())
    }

    /// Requests sent so far, in order
    pub fn sent_requests(&self) -> Vec<Vec<u8>> {
        self.sent.lock().clone()
    }

    fn find_reply(&self, request: &[u8]) -> Option<Reply> {
        let replies = self.replies.read();

        // First try exact match
        if let Some((_, reply)) = replies.iter().find(|(req, _)| req == request) {
            return Some(reply.clone());
        }

        // Then try prefix match for variable-length requests
        replies
            .iter()
            .find(|(req, _)| !req.is_empty() && request.starts_with(req))
            .map(|(_, reply)| reply.clone())
    }
}

impl BusTransport for MockTransport {
    fn send_and_receive(
        &self,
        _tx_id: Option<u32>,
        _rx_id: u32,
        _protocol: Protocol,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, TransportError> {
        self.sent.lock().push(payload.to_vec());
        tracing::debug!(request = %hex::encode(&payload), "Mock transport: sent request");

        match self.find_reply(&payload) {
            Some(Reply::Frame(frame)) => Ok(Bytes::from(frame)),
            Some(Reply::Closed) => Err(TransportError::ConnectionClosed),
            Some(Reply::Timeout) | None => Err(TransportError::Timeout(format!(
                "no response within {} ms",
                timeout.as_millis()
            ))),
        }
    }
}
