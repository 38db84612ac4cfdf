//! Core value types carried by a [`super::Transaction`].
//!
//! These are plain data: the invariants that tie them together (signer
//! indices, signature ordering) are maintained by the transaction itself.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::event::Event;
use crate::types::{Address, Identifier};

// ---------------------------------------------------------------------------
// ProposalKey
// ---------------------------------------------------------------------------

/// The account key proposing a transaction, with the sequence number it
/// declares for that key.
///
/// Sequence numbers are checked on chain; nothing here enforces that they
/// increase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProposalKey {
    /// Account holding the key.
    pub address: Address,
    /// Index of the key on the account.
    pub key_index: u32,
    /// Sequence number being declared.
    pub sequence_number: u64,
}

impl ProposalKey {
    pub fn new(address: Address, key_index: u32, sequence_number: u64) -> Self {
        Self {
            address,
            key_index,
            sequence_number,
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionSignature
// ---------------------------------------------------------------------------

/// A signature produced by one account key.
///
/// `address` is the durable identity of the signer. `signer_index` is a
/// cache of the address's position in the transaction's signer list and
/// is rewritten whenever the proposer, payer or authorizers change. `None`
/// means the address is not currently a signer; such a signature stays in
/// the transaction but cannot be encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub address: Address,
    pub signer_index: Option<usize>,
    pub key_index: u32,
    #[serde(with = "hex::serde")]
    pub signature: Vec<u8>,
}

impl TransactionSignature {
    /// Ordering key within a signature sequence: signer first, then key.
    pub fn sort_key(&self) -> (Option<usize>, u32) {
        (self.signer_index, self.key_index)
    }
}

// ---------------------------------------------------------------------------
// TransactionStatus
// ---------------------------------------------------------------------------

/// Lifecycle state of a transaction as reported by the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TransactionStatus {
    /// The status is not known.
    #[default]
    Unknown,
    /// Submitted, awaiting inclusion in a collection.
    Pending,
    /// Included in a finalized block.
    Finalized,
    /// Executed, result not yet sealed.
    Executed,
    /// Execution result sealed.
    Sealed,
    /// Reference block too old; the transaction can no longer be included.
    Expired,
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "UNKNOWN",
            Self::Pending => "PENDING",
            Self::Finalized => "FINALIZED",
            Self::Executed => "EXECUTED",
            Self::Sealed => "SEALED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(name)
    }
}

impl FromStr for TransactionStatus {
    type Err = std::convert::Infallible;

    /// Parses the upper-case status name. Anything unrecognized is `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PENDING" => Self::Pending,
            "FINALIZED" => Self::Finalized,
            "EXECUTED" => Self::Executed,
            "SEALED" => Self::Sealed,
            "EXPIRED" => Self::Expired,
            _ => Self::Unknown,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionResult
// ---------------------------------------------------------------------------

/// Outcome of an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionResult {
    pub status: TransactionStatus,
    /// Execution error message, if the transaction reverted.
    pub error: Option<String>,
    pub events: Vec<Event>,
    pub block_id: Identifier,
    pub block_height: u64,
    pub transaction_id: Identifier,
}

impl TransactionResult {
    /// Returns `true` if execution reported an error.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
