//! Numeric field parsing
//!
//! Every numeric attribute goes through the same policy: an absent or empty
//! value is `Ok(None)`, a value that does not parse is `Err(Malformed)`.
//! Callers decide whether malformed means "absent" ([`or_absent`]) or makes
//! the surrounding entity unconstructible ([`required`]).

use std::str::FromStr;

use gds_conv::parse_hex_digits;
use tracing::warn;

use crate::error::FieldError;

/// Normalize a raw attribute: trimmed, empty → `None`
pub fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a decimal field
pub fn parse_decimal<T: FromStr>(field: &str, raw: Option<&str>) -> Result<Option<T>, FieldError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|_| FieldError::Malformed {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Parse a hex field, with or without `0x` prefix
///
/// Addresses, protocol codes, raw bounds and bitfield masks all share
/// [`parse_hex_digits`] for the text itself.
pub fn parse_hex(field: &str, raw: Option<&str>) -> Result<Option<u64>, FieldError> {
    match non_empty(raw) {
        None => Ok(None),
        Some(value) => parse_hex_digits(value)
            .map(Some)
            .ok_or_else(|| FieldError::Malformed {
                field: field.to_string(),
                value: value.to_string(),
            }),
    }
}

/// Treat a malformed optional field as absent, logging it
pub fn or_absent<T>(result: Result<Option<T>, FieldError>) -> Option<T> {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Ignoring malformed optional field");
            None
        }
    }
}

/// Require a field to be present and well-formed
pub fn required<T>(field: &str, result: Result<Option<T>, FieldError>) -> Result<T, FieldError> {
    result?.ok_or_else(|| FieldError::Missing(field.to_string()))
}
