//! gds-conv - conversion engine for GDS ECU definitions
//!
//! Maps a telemetry register's raw integer reading to a physical value or an
//! enumerated state.
//!
//! # Quick Start
//!
//! ```rust
//! use gds_conv::{resolve, ConversionParams, ConvertedValue};
//!
//! // Document form: A = factor, B = value to subtract
//! let params = ConversionParams::new(Some("0.5"), Some("40"), None, None);
//! let resolved = resolve(1, &params, None).unwrap();
//!
//! assert_eq!(resolved.conversion.equation(), "0.5X-40");
//! assert_eq!(
//!     resolved.conversion.evaluate(180),
//!     ConvertedValue::Physical { value: 50.0 }
//! );
//! ```
//!
//! # Conversion Kinds
//!
//! | Code | Variant | Evaluation |
//! |------|---------|------------|
//! | 1 | `Linear` | `factor * X + offset` |
//! | 2 | `LinearNoOffset` | `factor * X` |
//! | 3 | `BitfieldEnum` | `symbols[(X & mask) >> shift]` |

pub mod conversion;
pub mod error;
pub mod hex;
pub mod precision;
pub mod resolve;

pub use conversion::{Conversion, ConversionKind, ConvertedValue};
pub use error::{ConvError, ConvResult};
pub use hex::parse_hex_digits;
pub use precision::{precision_from_scale, round_to_precision, to_json_number};
pub use resolve::{resolve, ConvWarning, ConversionParams, Resolved, SymbolTableSource};
