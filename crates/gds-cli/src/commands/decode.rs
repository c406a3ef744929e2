//! Decode command - evaluate one telemetry conversion

use anyhow::{anyhow, Context, Result};
use gds_catalog::DefinitionCatalog;
use gds_conv::parse_hex_digits;
use serde_json::json;

use crate::output::OutputContext;

pub fn decode(
    catalog: &DefinitionCatalog,
    position: u32,
    raw: &str,
    ctx: &OutputContext,
) -> Result<()> {
    let node = catalog
        .current_data_at(position)
        .ok_or_else(|| anyhow!("No current data at position {}", position))?;
    let raw_value = parse_raw(raw)?;

    if let (Some(min), Some(max)) = (node.min_value, node.max_value) {
        if !node.in_range(raw_value) {
            ctx.warn(&format!(
                "Raw value {:#x} outside declared range {:#x}..={:#x}",
                raw_value, min, max
            ));
        }
    }

    let value = node.conversion.format(raw_value, node.decimal_points);
    let unit = if node.has_unit() {
        node.unit.clone()
    } else {
        String::new()
    };

    if ctx.is_json() {
        return ctx.json(&json!({
            "position": position,
            "name": node.name,
            "equation": node.conversion.equation(),
            "raw": raw_value,
            "value": node.conversion.to_json(raw_value, node.decimal_points),
            "unit": unit,
        }));
    }

    ctx.print_kv(&[
        ("Name", node.name.clone()),
        ("Equation", node.conversion.equation()),
        ("Raw", format!("{} ({:#x})", raw_value, raw_value)),
        ("Value", format!("{} {}", value, unit).trim_end().to_string()),
    ]);
    Ok(())
}

/// Parse a raw value given as decimal or `0x` hex
fn parse_raw(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if raw.starts_with("0x") || raw.starts_with("0X") {
        parse_hex_digits(raw).ok_or_else(|| anyhow!("Invalid hex value: {}", raw))
    } else {
        raw.parse::<u64>()
            .with_context(|| format!("Invalid raw value: {}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_raw() {
        assert_eq!(parse_raw("160").unwrap(), 160);
        assert_eq!(parse_raw("0xA0").unwrap(), 0xA0);
        assert_eq!(parse_raw(" 0X10 ").unwrap(), 0x10);
        assert!(parse_raw("A0").is_err());
        assert!(parse_raw("0xZZ").is_err());
        assert!(parse_raw("0x0x10").is_err());
    }
}
