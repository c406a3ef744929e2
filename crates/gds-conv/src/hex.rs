//! Hex integer text
//!
//! One policy for every hex value a definition or the command line carries:
//! surrounding whitespace is ignored, a single `0x`/`0X` prefix is allowed,
//! and everything after it must be hex digits.

/// Parse hex text such as `"F0"`, `"0xF0"` or `" f0 "`
///
/// Returns `None` for empty input, a repeated prefix, a sign, or any
/// non-hex digit.
pub fn parse_hex_digits(text: &str) -> Option<u64> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
