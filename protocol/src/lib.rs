// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Flow Transaction Protocol: Core Library
//!
//! Everything needed to turn a Flow transaction into the exact bytes that
//! get signed, hashed and sent over the wire, and to turn those bytes back
//! into a transaction.
//!
//! ## Architecture
//!
//! - **transaction**: The transaction aggregate, signer list, signature
//!   ordering, canonical forms and their RLP codec.
//! - **cadence**: Argument value codecs (JSON-Cadence).
//! - **event**: Events emitted by executed transactions, grouped per block.
//! - **execution**: Execution results, chunks and service events.
//! - **types**: Fixed-width account addresses and 32-byte identifiers.
//! - **crypto**: SHA3-256, the transaction ID hash.
//! - **config**: Protocol constants.
//!
//! ## Design Philosophy
//!
//! 1. Byte-exact canonical encoding. Equal transactions encode equally,
//!    regardless of the order their fields were set in.
//! 2. Signer indices are derived state. They are never stored stale.
//! 3. Decoding is strict and never panics on malformed input.
//! 4. Signing keys stay out of this crate; it only produces messages.

pub mod cadence;
pub mod config;
pub mod crypto;
pub mod event;
pub mod execution;
pub mod transaction;
pub mod types;
