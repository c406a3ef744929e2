//! Building conversions from raw definition parameters
//!
//! A definition's `convrule` carries a kind code and four free-form
//! parameter slots `A`..`D`. Their meaning depends on the kind:
//!
//! | Kind | A | B | C | D |
//! |------|---|---|---|---|
//! | 1 linear | factor | subtrahend | - | - |
//! | 2 linear, no offset | factor | - | - | - |
//! | 3 bitfield enum | symbol table id | - | shift | mask (hex) |

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversion::{Conversion, ConversionKind};
use crate::error::{ConvError, ConvResult};
use crate::hex::parse_hex_digits;

/// Source of ordered symbol tables for bitfield conversions
pub trait SymbolTableSource {
    /// Load the table registered under `identifier`, `None` if there is none
    fn load_symbol_table(&self, identifier: &str) -> Option<Vec<String>>;
}

/// The four raw parameter slots of a conversion rule
///
/// Empty strings are normalized to `None` on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionParams {
    pub a: Option<String>,
    pub b: Option<String>,
    pub c: Option<String>,
    pub d: Option<String>,
}

impl ConversionParams {
    pub fn new(a: Option<&str>, b: Option<&str>, c: Option<&str>, d: Option<&str>) -> Self {
        Self {
            a: non_empty(a),
            b: non_empty(b),
            c: non_empty(c),
            d: non_empty(d),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Non-fatal degradation noticed while resolving
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConvWarning {
    /// Bitfield symbol table could not be loaded; labels will be blank
    MissingSymbolTable { identifier: String },
}

impl std::fmt::Display for ConvWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvWarning::MissingSymbolTable { identifier } => {
                write!(f, "symbol table '{}' not found, labels will be blank", identifier)
            }
        }
    }
}

/// A resolved conversion plus any warnings the caller should surface
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub conversion: Conversion,
    pub warnings: Vec<ConvWarning>,
}

/// Build a conversion from its kind code and raw parameters
///
/// `symbols` is only consulted for bitfield conversions; passing `None`
/// behaves like a source with no tables at all.
pub fn resolve(
    kind_code: u32,
    params: &ConversionParams,
    symbols: Option<&dyn SymbolTableSource>,
) -> ConvResult<Resolved> {
    let kind = ConversionKind::try_from(kind_code)?;
    let mut warnings = Vec::new();

    let conversion = match kind {
        ConversionKind::Linear => {
            let factor = required_float("A", params.a.as_deref())?;
            let subtrahend = optional_float("B", params.b.as_deref())?.unwrap_or(0.0);
            let offset = if subtrahend != 0.0 { -subtrahend } else { 0.0 };
            Conversion::Linear { factor, offset }
        }
        ConversionKind::LinearNoOffset => Conversion::LinearNoOffset {
            factor: required_float("A", params.a.as_deref())?,
        },
        ConversionKind::BitfieldEnum => {
            let shift = match params.c.as_deref() {
                Some(raw) => raw.parse::<u32>().map_err(|_| ConvError::MalformedParameter {
                    slot: "C",
                    value: raw.to_string(),
                })?,
                None => 0,
            };
            let mask_raw = params.d.as_deref().ok_or(ConvError::MissingParameter("D"))?;
            let mask = parse_hex_digits(mask_raw).ok_or_else(|| ConvError::MalformedParameter {
                slot: "D",
                value: mask_raw.to_string(),
            })?;

            let identifier = params.a.clone().unwrap_or_default();
            let table = symbols.and_then(|source| source.load_symbol_table(&identifier));
            let symbols = match table {
                Some(table) => table,
                None => {
                    warnings.push(ConvWarning::MissingSymbolTable { identifier });
                    Vec::new()
                }
            };

            Conversion::BitfieldEnum {
                shift,
                mask,
                symbols,
            }
        }
    };

    debug!(kind = %kind, equation = %conversion.equation(), "Resolved conversion");

    Ok(Resolved {
        conversion,
        warnings,
    })
}

fn required_float(slot: &'static str, raw: Option<&str>) -> ConvResult<f64> {
    optional_float(slot, raw)?.ok_or(ConvError::MissingParameter(slot))
}

fn optional_float(slot: &'static str, raw: Option<&str>) -> ConvResult<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConvError::MalformedParameter {
                slot,
                value: raw.to_string(),
            }),
    }
}
