//! Vehicle bus boundary
//!
//! The bus driver itself (CAN, ISO 9141, ISO 14230, J1850, ...) lives outside
//! this workspace. It is expected to frame and unframe bytes and expose one
//! blocking request/response exchange through [`BusTransport`].
//!
//! [`MockTransport`] answers from a scripted table and is used by tests and by
//! the CLI's offline procedure runs.

mod error;
pub mod mock;

pub use error::TransportError;
pub use mock::{MockTransport, ScriptEntry};

use std::time::Duration;

use bytes::Bytes;

use crate::protocol::Protocol;

/// Transport-agnostic request/response exchange with an ECU
pub trait BusTransport {
    /// Send a request and wait for the response
    ///
    /// # Arguments
    /// * `tx_id` - Tester (source) address, if the protocol uses one
    /// * `rx_id` - Module (destination) address
    /// * `protocol` - Bus protocol the ECU speaks
    /// * `payload` - Raw request bytes
    /// * `timeout` - Maximum time to wait for a response
    fn send_and_receive(
        &self,
        tx_id: Option<u32>,
        rx_id: u32,
        protocol: Protocol,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, TransportError>;
}

impl<T: BusTransport + ?Sized> BusTransport for &T {
    fn send_and_receive(
        &self,
        tx_id: Option<u32>,
        rx_id: u32,
        protocol: Protocol,
        payload: Bytes,
        timeout: Duration,
    ) -> Result<Bytes, TransportError> {
        (**self).send_and_receive(tx_id, rx_id, protocol, payload, timeout)
    }
}
