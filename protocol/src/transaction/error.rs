//! Error types for transaction construction, encoding and decoding.
//!
//! Every fallible operation in the transaction core returns a
//! [`TransactionError`]. Nothing is retried internally; a failed encode or
//! decode produces no partial value.

use thiserror::Error;

use crate::cadence::ArgumentCodecError;
use crate::types::Address;

/// Errors that can occur while building, encoding or decoding a transaction.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The argument codec rejected a value during encoding.
    #[error("failed to encode argument: {0}")]
    ArgumentEncode(#[source] ArgumentCodecError),

    /// The stored argument bytes at `index` are not validly encoded.
    #[error("failed to decode argument at index {index}: {source}")]
    ArgumentDecode {
        /// Position of the argument.
        index: usize,
        /// Codec failure.
        #[source]
        source: ArgumentCodecError,
    },

    /// Argument access past the end of the argument list.
    #[error("no argument at index {index} (transaction has {count})")]
    ArgumentIndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Number of stored arguments.
        count: usize,
    },

    /// A signature's address is not a signer of the transaction, so the
    /// signature cannot be placed in a canonical form.
    #[error("signature from {address} (key {key_index}) has no signer index")]
    UnresolvedSigner {
        /// Address on the orphaned signature.
        address: Address,
        /// Key index on the orphaned signature.
        key_index: u32,
    },

    /// A decoded signature references a signer index past the end of the
    /// signer list derived from the decoded payload.
    #[error("signer index {index} out of range ({signers} signers)")]
    UnknownSignerIndex {
        /// Index found in the bytes.
        index: u64,
        /// Length of the derived signer list.
        signers: usize,
    },

    /// A decoded integer does not fit the field it is stored in.
    #[error("{field} value {value} exceeds its range")]
    IntegerOverflow {
        /// Name of the field.
        field: &'static str,
        /// Decoded value.
        value: u64,
    },

    /// Decode was called on an empty byte slice.
    #[error("empty transaction input")]
    EmptyInput,

    /// A list was required but a byte string was found, or vice versa.
    #[error("unexpected rlp kind: expected {expected}")]
    UnexpectedKind {
        /// The kind that the grammar requires at this position.
        expected: &'static str,
    },

    /// Bytes or list elements remain after a complete canonical value.
    #[error("{0} trailing bytes after canonical value")]
    TrailingData(usize),

    /// Low-level RLP failure: truncation, non-canonical integers, bad lengths.
    #[error("rlp decode error: {0}")]
    Rlp(#[from] alloy_rlp::Error),
}

/// Convenience alias used throughout the transaction module.
pub type Result<T, E = TransactionError> = std::result::Result<T, E>;
