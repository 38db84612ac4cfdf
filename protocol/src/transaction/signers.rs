//! Signer list resolution.
//!
//! The signer list is the deduplicated, ordered set of accounts that must
//! sign a transaction. Canonical signatures refer to signers by position
//! in this list rather than by address, so its order is part of what gets
//! signed:
//!
//! 1. proposer
//! 2. payer
//! 3. authorizers, in insertion order
//!
//! An address used in several roles appears once, at its first role. The
//! empty address is skipped for the proposer and payer roles.

use std::collections::HashMap;

use crate::types::Address;

/// The ordered signer list and its reverse index.
///
/// A pure function of (proposer, payer, authorizers): two transactions with
/// the same final field values resolve to the same list no matter in which
/// order their setters were called.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignerList {
    signers: Vec<Address>,
    positions: HashMap<Address, usize>,
}

impl SignerList {
    /// Resolves the signer list for the given roles.
    pub fn resolve(proposer: &Address, payer: &Address, authorizers: &[Address]) -> Self {
        let mut list = Self {
            signers: Vec::with_capacity(2 + authorizers.len()),
            positions: HashMap::with_capacity(2 + authorizers.len()),
        };

        if !proposer.is_empty() {
            list.push(*proposer);
        }
        if !payer.is_empty() {
            list.push(*payer);
        }
        for authorizer in authorizers {
            list.push(*authorizer);
        }

        list
    }

    fn push(&mut self, address: Address) {
        if self.positions.contains_key(&address) {
            return;
        }
        self.positions.insert(address, self.signers.len());
        self.signers.push(address);
    }

    /// Signer addresses in index order.
    pub fn addresses(&self) -> &[Address] {
        &self.signers
    }

    /// Position of `address` in the list, if it is a signer.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.positions.get(address).copied()
    }

    /// Address at `index`, if in range.
    pub fn address_at(&self, index: usize) -> Option<Address> {
        self.signers.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}
