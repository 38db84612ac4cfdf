//! The transaction aggregate and its fluent builder.
//!
//! [`Transaction`] owns the logical fields and both signature sequences.
//! Every setter that touches the proposer, payer or authorizers re-resolves
//! the signer list and re-indexes all signatures before returning, so a
//! caller holding `&Transaction` never sees a stale signer index.
//!
//! [`TransactionBuilder`] is the consuming counterpart for assembling a
//! transaction in one expression.

use serde::{Deserialize, Serialize};

use super::canonical::{CanonicalForm, EnvelopeForm, FormKind, FullForm, PayloadForm, SignatureForm};
use super::codec::encode_to_vec;
use super::error::{Result, TransactionError};
use super::signatures::{SignatureCollection, SignatureRole};
use super::signers::SignerList;
use super::types::{ProposalKey, TransactionSignature};
use crate::cadence::ArgumentCodec;
use crate::config::DEFAULT_TRANSACTION_GAS_LIMIT;
use crate::crypto::sha3_256;
use crate::types::{Address, Identifier};

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A transaction: a Cadence script with its arguments, the accounts taking
/// part in it, and the signatures collected so far.
///
/// Three byte strings can be derived from it:
///
/// - [`Transaction::payload_message`], signed by proposer and authorizers;
/// - [`Transaction::envelope_message`], signed by the payer;
/// - [`Transaction::encode`], the full transport encoding.
///
/// [`Transaction::decode`] accepts the output of any of the three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TransactionRecord", into = "TransactionRecord")]
pub struct Transaction {
    script: Vec<u8>,
    arguments: Vec<Vec<u8>>,
    reference_block_id: Identifier,
    gas_limit: u64,
    proposal_key: ProposalKey,
    payer: Address,
    authorizers: Vec<Address>,
    signatures: SignatureCollection,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    /// An empty transaction with the default gas limit.
    pub fn new() -> Self {
        Self {
            script: Vec::new(),
            arguments: Vec::new(),
            reference_block_id: Identifier::EMPTY,
            gas_limit: DEFAULT_TRANSACTION_GAS_LIMIT,
            proposal_key: ProposalKey::default(),
            payer: Address::EMPTY,
            authorizers: Vec::new(),
            signatures: SignatureCollection::new(),
        }
    }

    // -- script & arguments -------------------------------------------------

    pub fn script(&self) -> &[u8] {
        &self.script
    }

    /// Sets the UTF-8 Cadence source of the transaction.
    pub fn set_script(&mut self, script: impl Into<Vec<u8>>) -> &mut Self {
        self.script = script.into();
        self
    }

    /// Pre-encoded arguments, in order.
    pub fn arguments(&self) -> &[Vec<u8>] {
        &self.arguments
    }

    /// Appends an already-encoded argument.
    ///
    /// The bytes are stored as given. One trailing newline is dropped when
    /// the payload form is built, see [`PayloadForm::from_transaction`].
    pub fn add_raw_argument(&mut self, argument: impl Into<Vec<u8>>) -> &mut Self {
        self.arguments.push(argument.into());
        self
    }

    /// Encodes `value` with `codec` and appends it.
    pub fn add_argument<C: ArgumentCodec>(
        &mut self,
        codec: &C,
        value: &C::Value,
    ) -> Result<&mut Self> {
        let encoded = codec.encode(value).map_err(TransactionError::ArgumentEncode)?;
        Ok(self.add_raw_argument(encoded))
    }

    /// Decodes the argument at `index` with `codec`.
    pub fn argument<C: ArgumentCodec>(
        &self,
        codec: &C,
        index: usize,
        options: &C::Options,
    ) -> Result<C::Value> {
        let encoded = self
            .arguments
            .get(index)
            .ok_or(TransactionError::ArgumentIndexOutOfRange {
                index,
                count: self.arguments.len(),
            })?;
        codec
            .decode(encoded, options)
            .map_err(|source| TransactionError::ArgumentDecode { index, source })
    }

    // -- payload fields -----------------------------------------------------

    pub fn reference_block_id(&self) -> &Identifier {
        &self.reference_block_id
    }

    /// Sets the block the transaction's expiry is measured from.
    pub fn set_reference_block_id(&mut self, block_id: Identifier) -> &mut Self {
        self.reference_block_id = block_id;
        self
    }

    pub fn gas_limit(&self) -> u64 {
        self.gas_limit
    }

    pub fn set_gas_limit(&mut self, limit: u64) -> &mut Self {
        self.gas_limit = limit;
        self
    }

    pub fn proposal_key(&self) -> &ProposalKey {
        &self.proposal_key
    }

    /// Sets the proposal key and the sequence number it declares.
    pub fn set_proposal_key(
        &mut self,
        address: Address,
        key_index: u32,
        sequence_number: u64,
    ) -> &mut Self {
        self.proposal_key = ProposalKey::new(address, key_index, sequence_number);
        self.refresh_signer_indices();
        self
    }

    pub fn payer(&self) -> &Address {
        &self.payer
    }

    /// Sets the account paying the fees.
    pub fn set_payer(&mut self, address: Address) -> &mut Self {
        self.payer = address;
        self.refresh_signer_indices();
        self
    }

    pub fn authorizers(&self) -> &[Address] {
        &self.authorizers
    }

    /// Appends an account authorizing changes to its own state.
    pub fn add_authorizer(&mut self, address: Address) -> &mut Self {
        self.authorizers.push(address);
        self.refresh_signer_indices();
        self
    }

    // -- signers & signatures ----------------------------------------------

    /// The deduplicated signer list for the current proposer, payer and
    /// authorizers.
    pub fn signers(&self) -> SignerList {
        SignerList::resolve(&self.proposal_key.address, &self.payer, &self.authorizers)
    }

    pub fn payload_signatures(&self) -> &[TransactionSignature] {
        self.signatures.payload()
    }

    pub fn envelope_signatures(&self) -> &[TransactionSignature] {
        self.signatures.envelope()
    }

    /// Adds a signature over the payload message.
    pub fn add_payload_signature(
        &mut self,
        address: Address,
        key_index: u32,
        signature: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.add_signature(SignatureRole::Payload, address, key_index, signature.into())
    }

    /// Adds a signature over the envelope message.
    pub fn add_envelope_signature(
        &mut self,
        address: Address,
        key_index: u32,
        signature: impl Into<Vec<u8>>,
    ) -> &mut Self {
        self.add_signature(SignatureRole::Envelope, address, key_index, signature.into())
    }

    fn add_signature(
        &mut self,
        role: SignatureRole,
        address: Address,
        key_index: u32,
        signature: Vec<u8>,
    ) -> &mut Self {
        let signers = self.signers();
        self.signatures
            .insert(role, &signers, address, key_index, signature);
        self
    }

    fn refresh_signer_indices(&mut self) {
        if self.signatures.is_empty() {
            return;
        }
        let signers = self.signers();
        self.signatures.reindex(&signers);
        tracing::debug!(
            signers = signers.len(),
            payload_signatures = self.signatures.payload().len(),
            envelope_signatures = self.signatures.envelope().len(),
            "re-indexed signatures"
        );
    }

    // -- canonical forms & messages ----------------------------------------

    pub fn payload_form(&self) -> PayloadForm {
        PayloadForm::from_transaction(self)
    }

    pub fn envelope_form(&self) -> Result<EnvelopeForm> {
        EnvelopeForm::from_transaction(self)
    }

    pub fn full_form(&self) -> Result<FullForm> {
        FullForm::from_transaction(self)
    }

    /// Bytes signed by the proposer and authorizers.
    pub fn payload_message(&self) -> Vec<u8> {
        encode_to_vec(&self.payload_form())
    }

    /// Bytes signed by the payer: payload plus payload signatures.
    ///
    /// Fails with [`TransactionError::UnresolvedSigner`] if a payload
    /// signature belongs to an account that is no longer a signer.
    pub fn envelope_message(&self) -> Result<Vec<u8>> {
        Ok(encode_to_vec(&self.envelope_form()?))
    }

    /// Full transport encoding: payload plus both signature sequences.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(encode_to_vec(&self.full_form()?))
    }

    /// The transaction ID: SHA3-256 of [`Transaction::encode`].
    pub fn id(&self) -> Result<Identifier> {
        Ok(sha3_256(&self.encode()?))
    }

    // -- decoding -----------------------------------------------------------

    /// Decodes the output of `payload_message`, `envelope_message` or
    /// `encode`, detecting which one it is.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::from_canonical(CanonicalForm::sniff(bytes)?)
    }

    /// Decodes bytes that must be of the given shape.
    pub fn decode_as(kind: FormKind, bytes: &[u8]) -> Result<Self> {
        Self::from_canonical(CanonicalForm::decode_as(kind, bytes)?)
    }

    /// Rebuilds a transaction from a decoded canonical form.
    ///
    /// Signer indices in the form are resolved to addresses through the
    /// signer list of the decoded payload itself. Arguments are taken as
    /// decoded; the usual newline strip still applies when they are encoded
    /// again.
    pub fn from_canonical(form: CanonicalForm) -> Result<Self> {
        let (payload, payload_signatures, envelope_signatures) = form.into_parts();

        let mut tx = Self {
            script: payload.script,
            arguments: payload.arguments,
            reference_block_id: Identifier::from_bytes(&payload.reference_block_id),
            gas_limit: payload.gas_limit,
            proposal_key: ProposalKey::new(
                Address::from_bytes(&payload.proposal_key_address),
                key_index_from(payload.proposal_key_index)?,
                payload.proposal_key_sequence_number,
            ),
            payer: Address::from_bytes(&payload.payer),
            authorizers: payload
                .authorizers
                .iter()
                .map(|a| Address::from_bytes(a))
                .collect(),
            signatures: SignatureCollection::new(),
        };

        let signers = tx.signers();
        for (role, sigs) in [
            (SignatureRole::Payload, payload_signatures),
            (SignatureRole::Envelope, envelope_signatures),
        ] {
            for sig in sigs {
                let address = resolve_signer(&signers, &sig)?;
                let key_index = key_index_from(sig.key_index)?;
                tx.signatures
                    .insert(role, &signers, address, key_index, sig.signature);
            }
        }

        Ok(tx)
    }
}

fn resolve_signer(signers: &SignerList, sig: &SignatureForm) -> Result<Address> {
    usize::try_from(sig.signer_index)
        .ok()
        .and_then(|i| signers.address_at(i))
        .ok_or(TransactionError::UnknownSignerIndex {
            index: sig.signer_index,
            signers: signers.len(),
        })
}

fn key_index_from(value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| TransactionError::IntegerOverflow {
        field: "key index",
        value,
    })
}

// ---------------------------------------------------------------------------
// Serde representation
// ---------------------------------------------------------------------------

/// JSON shape of a transaction. Signer indices on input are ignored and
/// recomputed; on output they reflect the current signer list.
#[derive(Serialize, Deserialize)]
struct TransactionRecord {
    #[serde(with = "hex::serde")]
    script: Vec<u8>,
    #[serde(with = "hex_list", default)]
    arguments: Vec<Vec<u8>>,
    reference_block_id: Identifier,
    gas_limit: u64,
    proposal_key: ProposalKey,
    payer: Address,
    #[serde(default)]
    authorizers: Vec<Address>,
    #[serde(default)]
    payload_signatures: Vec<TransactionSignature>,
    #[serde(default)]
    envelope_signatures: Vec<TransactionSignature>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let mut tx = Transaction {
            script: record.script,
            arguments: record.arguments,
            reference_block_id: record.reference_block_id,
            gas_limit: record.gas_limit,
            proposal_key: record.proposal_key,
            payer: record.payer,
            authorizers: record.authorizers,
            signatures: SignatureCollection::new(),
        };
        for sig in record.payload_signatures {
            tx.add_payload_signature(sig.address, sig.key_index, sig.signature);
        }
        for sig in record.envelope_signatures {
            tx.add_envelope_signature(sig.address, sig.key_index, sig.signature);
        }
        tx
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        Self {
            payload_signatures: tx.payload_signatures().to_vec(),
            envelope_signatures: tx.envelope_signatures().to_vec(),
            script: tx.script,
            arguments: tx.arguments,
            reference_block_id: tx.reference_block_id,
            gas_limit: tx.gas_limit,
            proposal_key: tx.proposal_key,
            payer: tx.payer,
            authorizers: tx.authorizers,
        }
    }
}

mod hex_list {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(items: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`].
///
/// ```rust
/// use flow_tx_protocol::transaction::TransactionBuilder;
/// use flow_tx_protocol::types::Address;
///
/// let alice = Address::from_bytes(&[1]);
/// let tx = TransactionBuilder::new()
///     .script("transaction { prepare(acct: AuthAccount) {} }")
///     .gas_limit(100)
///     .proposal_key(alice, 0, 5)
///     .payer(alice)
///     .authorizer(alice)
///     .build();
///
/// assert_eq!(tx.signers().addresses(), &[alice]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    /// Starts from an empty transaction with the default gas limit.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, script: impl Into<Vec<u8>>) -> Self {
        self.tx.set_script(script);
        self
    }

    /// Appends a pre-encoded argument.
    pub fn argument(mut self, argument: impl Into<Vec<u8>>) -> Self {
        self.tx.add_raw_argument(argument);
        self
    }

    /// Encodes and appends an argument value.
    pub fn argument_value<C: ArgumentCodec>(mut self, codec: &C, value: &C::Value) -> Result<Self> {
        self.tx.add_argument(codec, value)?;
        Ok(self)
    }

    pub fn reference_block_id(mut self, block_id: Identifier) -> Self {
        self.tx.set_reference_block_id(block_id);
        self
    }

    pub fn gas_limit(mut self, limit: u64) -> Self {
        self.tx.set_gas_limit(limit);
        self
    }

    pub fn proposal_key(mut self, address: Address, key_index: u32, sequence_number: u64) -> Self {
        self.tx.set_proposal_key(address, key_index, sequence_number);
        self
    }

    pub fn payer(mut self, address: Address) -> Self {
        self.tx.set_payer(address);
        self
    }

    pub fn authorizer(mut self, address: Address) -> Self {
        self.tx.add_authorizer(address);
        self
    }

    pub fn payload_signature(
        mut self,
        address: Address,
        key_index: u32,
        signature: impl Into<Vec<u8>>,
    ) -> Self {
        self.tx.add_payload_signature(address, key_index, signature);
        self
    }

    pub fn envelope_signature(
        mut self,
        address: Address,
        key_index: u32,
        signature: impl Into<Vec<u8>>,
    ) -> Self {
        self.tx.add_envelope_signature(address, key_index, signature);
        self
    }

    pub fn build(self) -> Transaction {
        self.tx
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
