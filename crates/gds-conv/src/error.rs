//! Error types for conversion resolution

use thiserror::Error;

/// Errors that can occur while building a conversion from definition fields
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvError {
    /// The `convtype` code is not one of the known conversion kinds
    #[error("unknown conversion kind: {0}")]
    UnknownConversionKind(u32),

    /// A parameter the conversion cannot do without is absent
    #[error("missing conversion parameter {0}")]
    MissingParameter(&'static str),

    /// A parameter is present but does not parse as a number
    #[error("malformed conversion parameter {slot}: '{value}'")]
    MalformedParameter { slot: &'static str, value: String },
}

/// Result type for conversion operations
pub type ConvResult<T> = Result<T, ConvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConvError::UnknownConversionKind(7).to_string(),
            "unknown conversion kind: 7"
        );
        assert_eq!(
            ConvError::MalformedParameter {
                slot: "A",
                value: "abc".to_string()
            }
            .to_string(),
            "malformed conversion parameter A: 'abc'"
        );
    }
}
