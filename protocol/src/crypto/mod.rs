//! # Hashing Primitives
//!
//! Signature generation and verification happen outside this crate; the
//! only cryptography the transaction core needs is the hash that turns a
//! full transaction encoding into its ledger identifier.

pub mod hash;

pub use hash::sha3_256;
