//! # Argument Value Codec
//!
//! Transaction arguments are stored as pre-encoded byte strings. Turning a
//! typed value into those bytes (and back) is the job of an
//! [`ArgumentCodec`], passed explicitly into
//! [`crate::transaction::Transaction::add_argument`] and
//! [`crate::transaction::Transaction::argument`]. The transaction core never
//! looks inside the bytes beyond the trailing-newline workaround.
//!
//! [`JsonCdc`] is the JSON-Cadence implementation used on the wire today.

pub mod json;

pub use json::{JsonCdc, JsonCdcOptions};

use thiserror::Error;

/// Errors raised by an argument codec.
#[derive(Debug, Error)]
pub enum ArgumentCodecError {
    /// The bytes are not valid JSON, or the value could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON is well-formed but is not a valid encoded value.
    #[error("malformed value at {path}: {reason}")]
    Malformed {
        /// JSON path to the offending value, e.g. `$.value[2]`.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The value carries a type tag the codec does not recognize.
    #[error("unknown value type {type_name:?} at {path}")]
    UnknownType {
        /// JSON path to the offending value.
        path: String,
        /// The unrecognized type tag.
        type_name: String,
    },
}

/// Encodes typed argument values to self-describing bytes and back.
pub trait ArgumentCodec {
    /// The in-memory value type.
    type Value;

    /// Options recognized by [`ArgumentCodec::decode`].
    type Options: Default;

    /// Encodes a value to its byte representation.
    fn encode(&self, value: &Self::Value) -> Result<Vec<u8>, ArgumentCodecError>;

    /// Decodes bytes previously produced by [`ArgumentCodec::encode`].
    fn decode(&self, bytes: &[u8], options: &Self::Options)
        -> Result<Self::Value, ArgumentCodecError>;
}
