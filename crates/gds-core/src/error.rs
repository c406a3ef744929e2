//! Common error types

use thiserror::Error;

/// Errors raised while reading a numeric field of the document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// Field is required but absent or empty
    #[error("missing field '{0}'")]
    Missing(String),

    /// Field is present but not a number of the expected form
    #[error("malformed field '{field}': '{value}'")]
    Malformed { field: String, value: String },
}

/// Errors identifying the bus protocol of a definition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// `protocolid` missing or not hex
    #[error(transparent)]
    Field(#[from] FieldError),

    /// Well-formed code that names no known protocol
    #[error("unknown protocol code: 0x{0:X}")]
    Unknown(u32),
}

/// Errors parsing hex byte strings and patterns
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("odd number of hex digits in '{0}'")]
    OddLength(String),

    #[error("invalid hex byte '{byte}' in '{input}'")]
    InvalidByte { byte: String, input: String },

    #[error("wildcard byte in concrete payload '{0}'")]
    Wildcard(String),
}

/// Errors loading a document tree from disk
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid hex in document: {0}")]
    Pattern(#[from] PatternError),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),
}
