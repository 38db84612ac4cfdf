//! # Events
//!
//! Events emitted by executed transactions, with their two canonical RLP
//! encodings: [`Event::encode`] identifies an event by its position, while
//! [`Event::fingerprint`] commits to its full contents.
//!
//! [`BlockEvents`] groups the events of one block, and
//! [`AccountCreatedEvent`] reads the new account's address out of a
//! `flow.AccountCreated` payload.

use alloy_rlp::{BufMut, Encodable, Header};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::cadence::{ArgumentCodec, ArgumentCodecError, JsonCdc, JsonCdcOptions};
use crate::transaction::encode_to_vec;
use crate::types::{Address, Identifier, ParseError};

/// Emitted when a transaction creates a new account.
pub const EVENT_ACCOUNT_CREATED: &str = "flow.AccountCreated";
pub const EVENT_ACCOUNT_KEY_ADDED: &str = "flow.AccountKeyAdded";
pub const EVENT_ACCOUNT_KEY_REMOVED: &str = "flow.AccountKeyRemoved";
pub const EVENT_ACCOUNT_CONTRACT_ADDED: &str = "flow.AccountContractAdded";
pub const EVENT_ACCOUNT_CONTRACT_UPDATED: &str = "flow.AccountContractUpdated";
pub const EVENT_ACCOUNT_CONTRACT_REMOVED: &str = "flow.AccountContractRemoved";

/// An event emitted during transaction execution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Event {
    /// Fully qualified event type, e.g. `flow.AccountCreated`.
    pub event_type: String,
    pub transaction_id: Identifier,
    /// Position of the emitting transaction within its block.
    pub transaction_index: u32,
    /// Position of the event within the emitting transaction.
    pub event_index: u32,
    /// Encoded event fields.
    #[serde(with = "hex::serde")]
    pub payload: Vec<u8>,
}

impl Event {
    /// Returns `true` for the built-in account lifecycle events.
    pub fn is_account_event(&self) -> bool {
        matches!(
            self.event_type.as_str(),
            EVENT_ACCOUNT_CREATED
                | EVENT_ACCOUNT_KEY_ADDED
                | EVENT_ACCOUNT_KEY_REMOVED
                | EVENT_ACCOUNT_CONTRACT_ADDED
                | EVENT_ACCOUNT_CONTRACT_UPDATED
                | EVENT_ACCOUNT_CONTRACT_REMOVED
        )
    }

    /// RLP `[transaction_id, event_index]`.
    pub fn encode(&self) -> Vec<u8> {
        encode_to_vec(&EventKey(self))
    }

    /// RLP `[transaction_id, event_index, type, transaction_index, payload]`.
    pub fn fingerprint(&self) -> Vec<u8> {
        encode_to_vec(&EventFingerprint(self))
    }
}

// ---------------------------------------------------------------------------
// BlockEvents
// ---------------------------------------------------------------------------

/// The events that occurred in one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvents {
    pub block_id: Identifier,
    pub height: u64,
    pub block_timestamp: DateTime<Utc>,
    pub events: Vec<Event>,
}

impl BlockEvents {
    /// Events of the given type, in emission order.
    pub fn of_type<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events.iter().filter(move |e| e.event_type == event_type)
    }
}

// ---------------------------------------------------------------------------
// AccountCreatedEvent
// ---------------------------------------------------------------------------

/// Errors from reading typed data out of an event.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("expected a {expected} event, got {found}")]
    UnexpectedType {
        expected: &'static str,
        found: String,
    },

    #[error("failed to decode event payload: {0}")]
    Payload(#[from] ArgumentCodecError),

    /// The field at this position is missing or does not hold an address.
    #[error("event field {0} is not an address")]
    NotAnAddress(usize),

    #[error("invalid address in event payload: {0}")]
    Address(#[from] ParseError),
}

/// A `flow.AccountCreated` event.
///
/// Its payload is a JSON-Cadence event whose first field is the address of
/// the new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Event", into = "Event")]
pub struct AccountCreatedEvent(Event);

impl AccountCreatedEvent {
    /// Address of the newly created account.
    pub fn address(&self) -> Result<Address, EventError> {
        let value = JsonCdc.decode(&self.0.payload, &JsonCdcOptions::default())?;
        let field = value
            .pointer("/value/fields/0/value")
            .ok_or(EventError::NotAnAddress(0))?;
        if field.get("type").and_then(Value::as_str) != Some("Address") {
            return Err(EventError::NotAnAddress(0));
        }
        let raw = field
            .get("value")
            .and_then(Value::as_str)
            .ok_or(EventError::NotAnAddress(0))?;
        Ok(raw.parse()?)
    }

    pub fn event(&self) -> &Event {
        &self.0
    }

    pub fn into_inner(self) -> Event {
        self.0
    }
}

impl TryFrom<Event> for AccountCreatedEvent {
    type Error = EventError;

    fn try_from(event: Event) -> Result<Self, Self::Error> {
        if event.event_type != EVENT_ACCOUNT_CREATED {
            return Err(EventError::UnexpectedType {
                expected: EVENT_ACCOUNT_CREATED,
                found: event.event_type,
            });
        }
        Ok(Self(event))
    }
}

impl From<AccountCreatedEvent> for Event {
    fn from(event: AccountCreatedEvent) -> Self {
        event.0
    }
}

// ---------------------------------------------------------------------------
// RLP encodings
// ---------------------------------------------------------------------------

struct EventKey<'a>(&'a Event);

impl EventKey<'_> {
    fn payload_length(&self) -> usize {
        self.0.transaction_id.as_bytes().as_slice().length() + self.0.event_index.length()
    }
}

impl Encodable for EventKey<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        self.0.transaction_id.as_bytes().as_slice().encode(out);
        self.0.event_index.encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }
}

struct EventFingerprint<'a>(&'a Event);

impl EventFingerprint<'_> {
    fn payload_length(&self) -> usize {
        let e = self.0;
        e.transaction_id.as_bytes().as_slice().length()
            + e.event_index.length()
            + e.event_type.as_str().length()
            + e.transaction_index.length()
            + e.payload.as_slice().length()
    }
}

impl Encodable for EventFingerprint<'_> {
    fn encode(&self, out: &mut dyn BufMut) {
        let e = self.0;
        Header {
            list: true,
            payload_length: self.payload_length(),
        }
        .encode(out);
        e.transaction_id.as_bytes().as_slice().encode(out);
        e.event_index.encode(out);
        e.event_type.as_str().encode(out);
        e.transaction_index.encode(out);
        e.payload.as_slice().encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.payload_length();
        alloy_rlp::length_of_length(payload_length) + payload_length
    }
}
