//! # Protocol Configuration & Constants
//!
//! Every constant that shapes the canonical transaction bytes lives here.
//! Changing any of them changes what signers sign, so treat edits to this
//! file as a consensus change.

// ---------------------------------------------------------------------------
// Transaction Defaults
// ---------------------------------------------------------------------------

/// Gas limit assigned by [`crate::transaction::Transaction::new`]. High
/// enough for small transactions; callers running real workloads should
/// set their own.
pub const DEFAULT_TRANSACTION_GAS_LIMIT: u64 = 9999;

// ---------------------------------------------------------------------------
// Primitive Sizes
// ---------------------------------------------------------------------------

/// Length in bytes of an account address.
pub const ADDRESS_LENGTH: usize = 8;

/// Length in bytes of an identifier (block ID, transaction ID).
pub const IDENTIFIER_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Canonical Encoding
// ---------------------------------------------------------------------------

/// Byte stripped from the end of an argument before it enters the payload.
///
/// JSON-Cadence encoders emit a trailing newline; the payload must not carry
/// it until Cadence defines a canonical argument format.
pub const ARGUMENT_TRAILING_BYTE: u8 = b'\n';

/// First RLP prefix byte that denotes a list. Anything below is a byte string.
pub const RLP_LIST_THRESHOLD: u8 = alloy_rlp::EMPTY_LIST_CODE;
