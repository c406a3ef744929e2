//! Floating point precision handling
//!
//! Keeps displayed values free of artifacts like 13.000000001 by rounding to
//! the precision a node declares, or to one derived from its factor.

/// Determine appropriate decimal places from a conversion factor
///
/// # Examples
/// - factor 1.0 → 0 decimal places (integers)
/// - factor 0.1 → 1 decimal place
/// - factor 0.25 → 2 decimal places (1/4 needs 2 places)
pub fn precision_from_scale(scale: f64) -> u8 {
    let abs_scale = scale.abs();

    if abs_scale == 0.0 || !abs_scale.is_finite() {
        return 4;
    }

    if abs_scale >= 1.0 && (abs_scale - abs_scale.round()).abs() < 1e-9 {
        return 0;
    }

    // Scale by 10 until we get an integer (or close enough)
    let mut temp = abs_scale;
    let mut precision = 0u8;

    while precision < 6 {
        if (temp - temp.round()).abs() < 1e-9 {
            break;
        }
        temp *= 10.0;
        precision += 1;
    }

    precision
}

/// Round a value to the specified number of decimal places
pub fn round_to_precision(value: f64, precision: u8) -> f64 {
    if precision == 0 {
        value.round()
    } else {
        let factor = 10_f64.powi(precision as i32);
        (value * factor).round() / factor
    }
}

/// Format a value as a clean JSON number
///
/// Integral results come out as JSON integers (92, not 92.0).
pub fn to_json_number(value: f64, precision: u8) -> serde_json::Value {
    let rounded = round_to_precision(value, precision);

    if (rounded - rounded.round()).abs() < f64::EPSILON {
        let int_val = rounded.round() as i64;
        if (int_val as f64 - rounded).abs() < f64::EPSILON {
            return serde_json::json!(int_val);
        }
    }

    serde_json::json!(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precision_from_scale() {
        assert_eq!(precision_from_scale(1.0), 0);
        assert_eq!(precision_from_scale(10.0), 0);
        assert_eq!(precision_from_scale(0.5), 1);
        assert_eq!(precision_from_scale(0.1), 1);
        assert_eq!(precision_from_scale(0.25), 2);
        assert_eq!(precision_from_scale(0.01), 2);
        assert_eq!(precision_from_scale(2.5), 1);
        assert_eq!(precision_from_scale(-0.5), 1);
        assert_eq!(precision_from_scale(0.0), 4);
    }

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(1.234567, 0), 1.0);
        assert_eq!(round_to_precision(1.234567, 1), 1.2);
        assert_eq!(round_to_precision(1.234567, 3), 1.235);
    }

    #[test]
    fn test_to_json_number() {
        assert_eq!(to_json_number(92.0, 0), serde_json::json!(92));
        assert_eq!(to_json_number(1.4000000001, 2), serde_json::json!(1.4));
        assert_eq!(to_json_number(140.0 * 0.01, 2), serde_json::json!(1.4));
    }
}
