//! Conversion variants and their evaluation
//!
//! A [`Conversion`] is a closed set of transforms from a register's raw
//! integer reading to either a physical value or a symbolic state.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ConvError;
use crate::precision::{precision_from_scale, round_to_precision, to_json_number};

/// Conversion kind as coded by the `convtype` field of a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionKind {
    /// `factor * X + offset`
    Linear = 1,
    /// `factor * X`
    LinearNoOffset = 2,
    /// Mask and shift, then index into a symbol table
    BitfieldEnum = 3,
}

impl ConversionKind {
    /// Numeric code used by the definition document
    pub fn code(&self) -> u32 {
        *self as u32
    }
}

impl TryFrom<u32> for ConversionKind {
    type Error = ConvError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(ConversionKind::Linear),
            2 => Ok(ConversionKind::LinearNoOffset),
            3 => Ok(ConversionKind::BitfieldEnum),
            other => Err(ConvError::UnknownConversionKind(other)),
        }
    }
}

impl fmt::Display for ConversionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversionKind::Linear => "linear",
            ConversionKind::LinearNoOffset => "linear_no_offset",
            ConversionKind::BitfieldEnum => "bitfield_enum",
        };
        f.write_str(s)
    }
}

/// Raw-to-physical transform of a telemetry register
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conversion {
    /// physical = factor * raw + offset
    ///
    /// `offset` is stored already negated relative to the document's `B`
    /// field, which is written as a subtraction term.
    Linear { factor: f64, offset: f64 },
    /// physical = factor * raw
    LinearNoOffset { factor: f64 },
    /// label = symbols[(raw & mask) >> shift]
    BitfieldEnum {
        shift: u32,
        mask: u64,
        symbols: Vec<String>,
    },
}

/// Result of evaluating a conversion against a raw reading
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvertedValue {
    /// Numeric physical value
    Physical { value: f64 },
    /// Enumerated state. `label` is empty when the index has no symbol.
    Symbol { index: u64, label: String },
}

impl fmt::Display for ConvertedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertedValue::Physical { value } => write!(f, "{}", value),
            ConvertedValue::Symbol { label, .. } => f.write_str(label),
        }
    }
}

impl Conversion {
    /// Conversion kind of this variant
    pub fn kind(&self) -> ConversionKind {
        match self {
            Conversion::Linear { .. } => ConversionKind::Linear,
            Conversion::LinearNoOffset { .. } => ConversionKind::LinearNoOffset,
            Conversion::BitfieldEnum { .. } => ConversionKind::BitfieldEnum,
        }
    }

    /// Scale factor for numeric variants
    pub fn factor(&self) -> Option<f64> {
        match self {
            Conversion::Linear { factor, .. } | Conversion::LinearNoOffset { factor } => {
                Some(*factor)
            }
            Conversion::BitfieldEnum { .. } => None,
        }
    }

    /// Evaluate the conversion for a raw reading
    pub fn evaluate(&self, raw: u64) -> ConvertedValue {
        match self {
            Conversion::Linear { factor, offset } => ConvertedValue::Physical {
                value: factor * raw as f64 + offset,
            },
            Conversion::LinearNoOffset { factor } => ConvertedValue::Physical {
                value: factor * raw as f64,
            },
            Conversion::BitfieldEnum {
                shift,
                mask,
                symbols,
            } => {
                let index = (raw & mask).checked_shr(*shift).unwrap_or(0);
                let label = usize::try_from(index)
                    .ok()
                    .and_then(|i| symbols.get(i))
                    .cloned()
                    .unwrap_or_default();
                ConvertedValue::Symbol { index, label }
            }
        }
    }

    /// Render the symbolic equation, e.g. `2.5X-3` or `((X & 0xf0) >> 4) -> [OFF|ON]`
    pub fn equation(&self) -> String {
        match self {
            Conversion::Linear { factor, offset } => linear_equation(*factor, *offset),
            Conversion::LinearNoOffset { factor } => linear_equation(*factor, 0.0),
            Conversion::BitfieldEnum {
                shift,
                mask,
                symbols,
            } => format!("((X & {:#x}) >> {}) -> [{}]", mask, shift, symbols.join("|")),
        }
    }

    /// Evaluate and format for display
    ///
    /// `decimal_points` overrides the precision derived from the factor.
    pub fn format(&self, raw: u64, decimal_points: Option<u32>) -> String {
        match self.evaluate(raw) {
            ConvertedValue::Physical { value } => {
                let precision = self.display_precision(decimal_points);
                format!(
                    "{:.*}",
                    precision as usize,
                    round_to_precision(value, precision)
                )
            }
            ConvertedValue::Symbol { label, .. } => label,
        }
    }

    /// Evaluate to a clean JSON value
    pub fn to_json(&self, raw: u64, decimal_points: Option<u32>) -> Value {
        match self.evaluate(raw) {
            ConvertedValue::Physical { value } => {
                let precision = self.display_precision(decimal_points);
                to_json_number(value, precision)
            }
            ConvertedValue::Symbol { index, label } => json!({
                "index": index,
                "label": label,
            }),
        }
    }

    fn display_precision(&self, decimal_points: Option<u32>) -> u8 {
        match decimal_points {
            Some(points) => points.min(u8::MAX as u32) as u8,
            None => precision_from_scale(self.factor().unwrap_or(1.0)),
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.equation())
    }
}

fn linear_equation(factor: f64, offset: f64) -> String {
    let factor_term = if factor != 1.0 {
        format!("{}", factor)
    } else {
        String::new()
    };
    let offset_term = if offset < 0.0 {
        format!("-{}", offset.abs())
    } else if offset > 0.0 {
        format!("+{}", offset)
    } else {
        String::new()
    };
    format!("{}X{}", factor_term, offset_term)
}
