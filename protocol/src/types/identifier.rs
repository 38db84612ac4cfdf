//! 32-byte identifiers for blocks and transactions.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{decode_fixed_hex, ParseError};
use crate::config::IDENTIFIER_LENGTH;

/// A 32-byte identifier, typically a SHA3-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identifier([u8; IDENTIFIER_LENGTH]);

impl Identifier {
    /// The all-zero identifier.
    pub const EMPTY: Identifier = Identifier([0u8; IDENTIFIER_LENGTH]);

    /// Wraps raw identifier bytes.
    pub const fn new(bytes: [u8; IDENTIFIER_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Copies up to `IDENTIFIER_LENGTH` leading bytes into a zeroed identifier.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut out = [0u8; IDENTIFIER_LENGTH];
        let n = bytes.len().min(IDENTIFIER_LENGTH);
        out[..n].copy_from_slice(&bytes[..n]);
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; IDENTIFIER_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for Identifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed_hex::<IDENTIFIER_LENGTH>(s).map(Self)
    }
}

impl From<[u8; IDENTIFIER_LENGTH]> for Identifier {
    fn from(bytes: [u8; IDENTIFIER_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Identifier {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
