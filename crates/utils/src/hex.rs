// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Strict `0x` hex helpers shared by the wire types.
//!
//! The relayer speaks JSON where every byte string is a hex string. [`parse_hex`] accepts an
//! optional `0x` prefix, [`parse_prefixed_hex`] requires it. Output always carries it.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("{field}: expected a 0x prefixed hex string, found '{found}'")]
    MissingPrefix { field: String, found: String },
    #[error("{field}: expected a hex string, found '{found}'")]
    NotHex { field: String, found: String },
    #[error("{field}: hex string has odd length {length}")]
    OddLength { field: String, length: usize },
    #[error("{field}: expected {expected} bytes, found {found}")]
    WrongLength {
        field: String,
        expected: usize,
        found: usize,
    },
}

/// Strip a leading `0x`/`0X` if present
pub fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Parse a hex byte string. An empty string (or a bare `0x`) is the empty byte string.
pub fn parse_hex(field: &str, value: &str) -> Result<Vec<u8>, HexError> {
    let raw = strip_0x(value);
    if raw.len() % 2 != 0 {
        return Err(HexError::OddLength {
            field: field.to_string(),
            length: raw.len(),
        });
    }
    ::hex::decode(raw).map_err(|_| HexError::NotHex {
        field: field.to_string(),
        found: value.to_string(),
    })
}

/// Parse a hex byte string that must start with `0x`. A bare `0x` is the empty byte string.
pub fn parse_prefixed_hex(field: &str, value: &str) -> Result<Vec<u8>, HexError> {
    if !value.starts_with("0x") && !value.starts_with("0X") {
        return Err(HexError::MissingPrefix {
            field: field.to_string(),
            found: value.to_string(),
        });
    }
    parse_hex(field, value)
}

/// Parse a hex byte string that must decode to exactly `N` bytes
pub fn parse_hex_array<const N: usize>(field: &str, value: &str) -> Result<[u8; N], HexError> {
    let bytes = parse_hex(field, value)?;
    let found = bytes.len();
    bytes.try_into().map_err(|_| HexError::WrongLength {
        field: field.to_string(),
        expected: N,
        found,
    })
}

pub fn to_hex(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", ::hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("x", "0xdeadbeef").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(parse_hex("x", "DEADBEEF").unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(parse_hex("x", "0x").unwrap(), Vec::<u8>::new());
        assert_eq!(
            parse_hex("publicKey", "0xabc"),
            Err(HexError::OddLength {
                field: "publicKey".to_string(),
                length: 3
            })
        );
        assert!(matches!(
            parse_hex("x", "0xzz"),
            Err(HexError::NotHex { .. })
        ));
    }

    #[test]
    fn test_parse_prefixed_hex() {
        assert_eq!(parse_prefixed_hex("x", "0xabcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(parse_prefixed_hex("x", "0X01").unwrap(), vec![0x01]);
        assert_eq!(parse_prefixed_hex("x", "0x").unwrap(), Vec::<u8>::new());
        assert_eq!(
            parse_prefixed_hex("publicKey", "abcd"),
            Err(HexError::MissingPrefix {
                field: "publicKey".to_string(),
                found: "abcd".to_string()
            })
        );
        assert!(matches!(
            parse_prefixed_hex("x", ""),
            Err(HexError::MissingPrefix { .. })
        ));
        assert!(matches!(
            parse_prefixed_hex("x", "0xabc"),
            Err(HexError::OddLength { length: 3, .. })
        ));
    }

    #[test]
    fn test_parse_hex_array() {
        let arr: [u8; 2] = parse_hex_array("x", "0x0102").unwrap();
        assert_eq!(arr, [1, 2]);
        assert_eq!(
            parse_hex_array::<3>("x", "0x0102"),
            Err(HexError::WrongLength {
                field: "x".to_string(),
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex([0u8, 255]), "0x00ff");
        assert_eq!(to_hex(Vec::<u8>::new()), "0x");
    }
}
