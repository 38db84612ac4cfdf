//! # Primitive Ledger Types
//!
//! Fixed-width byte values that every transaction field is built from.
//! Both types parse from and display as lower-case hex, and serialize to
//! JSON as hex strings so that CLI output can be pasted back as input.

pub mod address;
pub mod identifier;

pub use address::Address;
pub use identifier::Identifier;

use thiserror::Error;

/// Errors from parsing a primitive out of its textual form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The string is not valid hex.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// The decoded value has the wrong number of bytes.
    #[error("invalid length: expected {expected} bytes, got {got}")]
    InvalidLength {
        /// Number of bytes the type holds.
        expected: usize,
        /// Number of bytes that were decoded.
        got: usize,
    },
}

/// Decode a hex string with an optional `0x` prefix into exactly `N` bytes.
pub(crate) fn decode_fixed_hex<const N: usize>(s: &str) -> Result<[u8; N], ParseError> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(trimmed).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(ParseError::InvalidLength {
            expected: N,
            got: bytes.len(),
        });
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_fixed_hex_accepts_prefix() {
        let with = decode_fixed_hex::<2>("0xabcd").unwrap();
        let without = decode_fixed_hex::<2>("abcd").unwrap();
        assert_eq!(with, [0xab, 0xcd]);
        assert_eq!(with, without);
    }

    #[test]
    fn decode_fixed_hex_rejects_wrong_length() {
        assert_eq!(
            decode_fixed_hex::<4>("abcd"),
            Err(ParseError::InvalidLength {
                expected: 4,
                got: 2
            })
        );
    }

    #[test]
    fn decode_fixed_hex_rejects_garbage() {
        assert!(matches!(
            decode_fixed_hex::<1>("zz"),
            Err(ParseError::InvalidHex(_))
        ));
    }
}
