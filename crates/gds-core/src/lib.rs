//! gds-core - Core model and collaborator traits for GDS ECU definitions
//!
//! This crate holds what every other stage shares: the generic document tree
//! a definition arrives as, the normalized entity model, and the boundaries
//! to the outside world (string lookups and the vehicle bus).

pub mod document;
pub mod error;
pub mod field;
pub mod lookup;
pub mod models;
pub mod pattern;
pub mod protocol;
pub mod transport;

pub use document::DocNode;
pub use error::{DocumentError, FieldError, PatternError, ProtocolError};
pub use lookup::{LookupService, LookupStore};
pub use models::*;
pub use pattern::BytePattern;
pub use protocol::Protocol;
pub use transport::{BusTransport, MockTransport, TransportError};
