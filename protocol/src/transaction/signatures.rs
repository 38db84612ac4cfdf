//! Ordered payload and envelope signature sequences.
//!
//! Both sequences are sorted by `(signer_index, key_index)` at all times.
//! Inserting places the new signature after any equal keys, so duplicate
//! `(address, key)` pairs are kept in arrival order. Re-indexing rewrites
//! every cached signer index from the current [`SignerList`] and re-sorts.

use super::signers::SignerList;
use super::types::TransactionSignature;
use crate::types::Address;

/// Which message a signature covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureRole {
    /// Signed over the payload message (proposer, authorizers).
    Payload,
    /// Signed over the envelope message (payer).
    Envelope,
}

/// The two signature sequences of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureCollection {
    payload: Vec<TransactionSignature>,
    envelope: Vec<TransactionSignature>,
}

impl SignatureCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a signature for `address` indexed against `signers` and
    /// inserts it into the sequence for `role`.
    pub fn insert(
        &mut self,
        role: SignatureRole,
        signers: &SignerList,
        address: Address,
        key_index: u32,
        signature: Vec<u8>,
    ) {
        let sig = TransactionSignature {
            address,
            signer_index: signers.index_of(&address),
            key_index,
            signature,
        };

        tracing::trace!(
            ?role,
            address = %sig.address,
            signer_index = ?sig.signer_index,
            key_index,
            "inserting signature"
        );

        let seq = self.sequence_mut(role);
        let key = sig.sort_key();
        let at = seq.partition_point(|s| s.sort_key() <= key);
        seq.insert(at, sig);
    }

    /// Recomputes every signer index from `signers` and restores sort order.
    ///
    /// Signatures whose address is no longer a signer keep their place in
    /// the collection with `signer_index = None`.
    pub fn reindex(&mut self, signers: &SignerList) {
        let mut unresolved = 0usize;
        for seq in [&mut self.payload, &mut self.envelope] {
            for sig in seq.iter_mut() {
                sig.signer_index = signers.index_of(&sig.address);
                if sig.signer_index.is_none() {
                    unresolved += 1;
                }
            }
            seq.sort_by_key(TransactionSignature::sort_key);
        }

        if unresolved > 0 {
            tracing::warn!(
                unresolved,
                "signatures reference accounts that are no longer signers"
            );
        }
    }

    /// Signatures over the payload message, in canonical order.
    pub fn payload(&self) -> &[TransactionSignature] {
        &self.payload
    }

    /// Signatures over the envelope message, in canonical order.
    pub fn envelope(&self) -> &[TransactionSignature] {
        &self.envelope
    }

    /// Returns `true` when no signature of either role is present.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty() && self.envelope.is_empty()
    }

    fn sequence_mut(&mut self, role: SignatureRole) -> &mut Vec<TransactionSignature> {
        match role {
            SignatureRole::Payload => &mut self.payload,
            SignatureRole::Envelope => &mut self.envelope,
        }
    }
}
