//! # Execution Results
//!
//! What an execution node reports for a block: the chunks the block was
//! split into, the state commitments around each chunk, and the service
//! events the protocol itself emitted.

use serde::{Deserialize, Serialize};

use crate::types::Identifier;

/// A 32-byte commitment to the execution state.
pub type StateCommitment = Identifier;

/// The result of executing one block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Result this one builds on.
    pub previous_result_id: Identifier,
    pub block_id: Identifier,
    #[serde(default)]
    pub chunks: Vec<Chunk>,
    #[serde(default)]
    pub service_events: Vec<ServiceEvent>,
}

impl ExecutionResult {
    /// State after the last chunk, if the block produced any chunks.
    pub fn final_state(&self) -> Option<&StateCommitment> {
        self.chunks.last().map(|c| &c.end_state)
    }

    /// Computation used by all chunks together.
    pub fn total_computation_used(&self) -> u64 {
        self.chunks
            .iter()
            .fold(0u64, |acc, c| acc.saturating_add(c.total_computation_used))
    }
}

/// One collection's share of a block execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chunk {
    pub collection_index: u64,
    pub start_state: StateCommitment,
    /// Block of the execution result this chunk belongs to.
    pub block_id: Identifier,
    pub total_computation_used: u64,
    pub number_of_transactions: u16,
    /// Position inside the execution result, from zero.
    pub index: u64,
    pub end_state: StateCommitment,
}

/// An event emitted by the protocol rather than by a transaction, e.g. an
/// epoch transition.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ServiceEvent {
    pub event_type: String,
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}
