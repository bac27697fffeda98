//! String <-> `DynSolValue` conversion for contract arguments and results

use alloy_dyn_abi::{DynSolType, DynSolValue};
use serde_json::Value;

/// Coerce one positional form value into its ABI type.
///
/// Takes whatever alloy's literal parser takes: decimal or `0x` integers, hex
/// addresses and bytes, `true`/`false`, bracketed arrays, bare or quoted strings.
pub fn parse_value(ty: &DynSolType, arg: &str) -> Result<DynSolValue, String> {
    ty.coerce_str(arg.trim()).map_err(|e| e.to_string())
}

/// Display text for a scalar value; `None` for arrays and tuples
pub fn format_scalar(value: &DynSolValue) -> Option<String> {
    let text = match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::FixedBytes(word, size) => {
            format!("0x{}", hex::encode(&word.as_slice()[..(*size).min(32)]))
        }
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        _ => return None,
    };
    Some(text)
}

/// JSON form of a decoded value. Integers become decimal strings so large
/// values survive the round trip.
pub fn to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(to_json).collect())
        }
        scalar => Value::String(format_scalar(scalar).unwrap_or_default()),
    }
}

/// Render a call's outputs: a lone scalar as itself, anything else as JSON
pub fn format_output(values: &[DynSolValue]) -> String {
    match values {
        [] => String::new(),
        [single] => format_scalar(single).unwrap_or_else(|| to_json(single).to_string()),
        many => Value::Array(many.iter().map(to_json).collect()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};

    use super::*;

    #[test]
    fn test_parse_uint_decimal_and_hex() {
        let ty = DynSolType::Uint(256);
        assert_eq!(
            parse_value(&ty, "100").unwrap(),
            DynSolValue::Uint(U256::from(100), 256)
        );
        assert_eq!(
            parse_value(&ty, "0x7dd").unwrap(),
            DynSolValue::Uint(U256::from(2013), 256)
        );
        assert!(parse_value(&ty, "abc").is_err());
    }

    #[test]
    fn test_parse_address() {
        let value = parse_value(
            &DynSolType::Address,
            "0x0000000000000000000000000000000000000010",
        )
        .unwrap();
        assert_eq!(value, DynSolValue::Address(Address::with_last_byte(0x10)));
        assert!(parse_value(&DynSolType::Address, "0xABC").is_err());
    }

    #[test]
    fn test_parse_bool_from_checkbox() {
        assert_eq!(
            parse_value(&DynSolType::Bool, "true").unwrap(),
            DynSolValue::Bool(true)
        );
        assert_eq!(
            parse_value(&DynSolType::Bool, "false").unwrap(),
            DynSolValue::Bool(false)
        );
    }

    #[test]
    fn test_parse_bytes32() {
        let input = format!("0x{}", "ab".repeat(32));
        match parse_value(&DynSolType::FixedBytes(32), &input).unwrap() {
            DynSolValue::FixedBytes(word, 32) => assert_eq!(word.as_slice(), &[0xab; 32]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_string_bare_or_quoted() {
        assert_eq!(
            parse_value(&DynSolType::String, " panarchy ").unwrap(),
            DynSolValue::String("panarchy".into())
        );
        assert_eq!(
            parse_value(&DynSolType::String, "\"panarchy\"").unwrap(),
            DynSolValue::String("panarchy".into())
        );
    }

    #[test]
    fn test_parse_array() {
        let ty = DynSolType::Array(Box::new(DynSolType::Uint(8)));
        assert_eq!(
            parse_value(&ty, "[1, 2]").unwrap(),
            DynSolValue::Array(vec![
                DynSolValue::Uint(U256::from(1), 8),
                DynSolValue::Uint(U256::from(2), 8)
            ])
        );
        assert_eq!(parse_value(&ty, "[]").unwrap(), DynSolValue::Array(vec![]));
    }

    #[test]
    fn test_format_single_scalar() {
        assert_eq!(
            format_output(&[DynSolValue::Uint(U256::from(42), 256)]),
            "42"
        );
        assert_eq!(format_output(&[DynSolValue::Bool(true)]), "true");
    }

    #[test]
    fn test_format_structured_as_json() {
        let out = format_output(&[DynSolValue::Tuple(vec![
            DynSolValue::Uint(U256::from(3), 256),
            DynSolValue::Bool(false),
        ])]);
        assert_eq!(out, r#"["3",false]"#);

        let many = format_output(&[
            DynSolValue::Uint(U256::from(1), 256),
            DynSolValue::Uint(U256::from(2), 256),
        ]);
        assert_eq!(many, r#"["1","2"]"#);
    }
}
