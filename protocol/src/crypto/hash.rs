//! # Hashing Utilities
//!
//! The ledger identifies transactions, blocks and collections by the
//! SHA3-256 digest of their canonical encoding. We only expose what the
//! transaction core actually hashes.

use sha3::{Digest, Sha3_256};

use crate::types::Identifier;

/// Compute the SHA3-256 hash of the input data as an [`Identifier`].
///
/// # Example
///
/// ```
/// use flow_tx_protocol::crypto::sha3_256;
///
/// let id = sha3_256(b"");
/// assert_eq!(
///     id.to_string(),
///     "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
/// );
/// ```
pub fn sha3_256(data: &[u8]) -> Identifier {
    let digest = Sha3_256::digest(data);
    Identifier::from_bytes(&digest)
}
