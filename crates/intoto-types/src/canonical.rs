//! Canonical JSON encoding
//!
//! This is the securesystemslib flavour of canonical JSON, which differs from
//! RFC 8785: object keys are sorted by byte value, there is no whitespace,
//! strings escape only `"` and `\` (control characters such as the newlines in
//! PEM text are written as-is), and only integers are allowed as numbers.
//!
//! Key ids are SHA-256 digests of this encoding, so its output is a wire
//! contract shared with the Go and Python implementations.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::Value;

/// Encode any serializable value as canonical JSON bytes
pub fn encode_canonical<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let value = serde_json::to_value(value)?;
    let mut out = Vec::new();
    write_value(&value, &mut out)?;
    Ok(out)
}

fn write_value(value: &Value, out: &mut Vec<u8>) -> Result<()> {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                out.extend_from_slice(i.to_string().as_bytes());
            } else if let Some(u) = n.as_u64() {
                out.extend_from_slice(u.to_string().as_bytes());
            } else {
                return Err(Error::Canonicalization(format!(
                    "floating point number {} is not allowed",
                    n
                )));
            }
        }
        Value::String(s) => write_string(s, out),
        Value::Array(items) => {
            out.push(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_value(item, out)?;
            }
            out.push(b']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                write_value(item, out)?;
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    out.push(b'"');
    for byte in s.bytes() {
        if byte == b'"' || byte == b'\\' {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out.push(b'"');
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn canonical(value: Value) -> String {
        String::from_utf8(encode_canonical(&value).unwrap()).unwrap()
    }

    #[test]
    fn test_keys_sorted_without_whitespace() {
        let value = json!({"scheme": "ed25519", "keytype": "ed25519", "a": [1, 2]});
        assert_eq!(
            canonical(value),
            r#"{"a":[1,2],"keytype":"ed25519","scheme":"ed25519"}"#
        );
    }

    #[test]
    fn test_nested_objects_sorted() {
        let value = json!({"b": {"z": null, "y": true}, "a": false});
        assert_eq!(canonical(value), r#"{"a":false,"b":{"y":true,"z":null}}"#);
    }

    #[test]
    fn test_only_quote_and_backslash_escaped() {
        let value = json!("line1\nline2 \"quoted\" back\\slash\ttab");
        assert_eq!(
            canonical(value),
            "\"line1\nline2 \\\"quoted\\\" back\\\\slash\ttab\""
        );
    }

    #[test]
    fn test_integers() {
        assert_eq!(
            canonical(json!([-3, 0, 18446744073709551615u64])),
            "[-3,0,18446744073709551615]"
        );
    }

    #[test]
    fn test_floats_rejected() {
        let err = encode_canonical(&json!({"n": 1.5})).unwrap_err();
        assert!(matches!(err, Error::Canonicalization(_)));
    }

    #[test]
    fn test_sort_is_bytewise() {
        let value = json!({"b": 1, "B": 2, "a": 3, "_": 4});
        assert_eq!(canonical(value), r#"{"B":2,"_":4,"a":3,"b":1}"#);
    }
}
