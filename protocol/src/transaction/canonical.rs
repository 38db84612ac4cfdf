//! Canonical forms: the value snapshots whose RLP encoding is signed and
//! transmitted.
//!
//! Signing is staged. Proposer and authorizers sign the payload form; the
//! payer signs the envelope form (payload plus payload signatures). The full
//! form adds envelope signatures and is what goes over the wire.
//!
//! ```text
//! payload  = [script, [args..], refBlockID, gasLimit, proposerAddr,
//!             proposerKeyIndex, proposerSeqNum, payer, [authorizers..]]
//! envelope = [payload, [[signerIndex, keyIndex, sig]..]]
//! full     = [payload, [payload sigs..], [envelope sigs..]]
//! ```
//!
//! Forms copy everything they need out of the transaction; nothing in them
//! borrows mutable transaction state. Building a payload form strips one
//! trailing `\n` from each argument copy, whichever way the argument got
//! into the transaction.

use super::builder::Transaction;
use super::error::{Result, TransactionError};
use super::types::TransactionSignature;
use crate::config::ARGUMENT_TRAILING_BYTE;

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Every transaction field except signatures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayloadForm {
    pub script: Vec<u8>,
    pub arguments: Vec<Vec<u8>>,
    pub reference_block_id: Vec<u8>,
    pub gas_limit: u64,
    pub proposal_key_address: Vec<u8>,
    pub proposal_key_index: u64,
    pub proposal_key_sequence_number: u64,
    pub payer: Vec<u8>,
    pub authorizers: Vec<Vec<u8>>,
}

/// A signature with its signer referenced by index instead of address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureForm {
    pub signer_index: u64,
    pub key_index: u64,
    pub signature: Vec<u8>,
}

/// Payload plus payload signatures; the message the payer signs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnvelopeForm {
    pub payload: PayloadForm,
    pub payload_signatures: Vec<SignatureForm>,
}

/// Payload plus both signature sequences; the transport encoding.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FullForm {
    pub payload: PayloadForm,
    pub payload_signatures: Vec<SignatureForm>,
    pub envelope_signatures: Vec<SignatureForm>,
}

/// Which of the three canonical shapes a byte string holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Payload,
    Envelope,
    Full,
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payload => write!(f, "payload"),
            Self::Envelope => write!(f, "envelope"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Any one of the canonical forms, as produced by decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalForm {
    Payload(PayloadForm),
    Envelope(EnvelopeForm),
    Full(FullForm),
}

impl CanonicalForm {
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Payload(_) => FormKind::Payload,
            Self::Envelope(_) => FormKind::Envelope,
            Self::Full(_) => FormKind::Full,
        }
    }

    pub fn payload(&self) -> &PayloadForm {
        match self {
            Self::Payload(p) => p,
            Self::Envelope(e) => &e.payload,
            Self::Full(f) => &f.payload,
        }
    }

    /// Splits into payload, payload signatures and envelope signatures.
    /// Signature sequences a form does not carry come back empty.
    pub fn into_parts(self) -> (PayloadForm, Vec<SignatureForm>, Vec<SignatureForm>) {
        match self {
            Self::Payload(p) => (p, Vec::new(), Vec::new()),
            Self::Envelope(e) => (e.payload, e.payload_signatures, Vec::new()),
            Self::Full(f) => (f.payload, f.payload_signatures, f.envelope_signatures),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction from a transaction
// ---------------------------------------------------------------------------

/// Drops a single trailing `\n` from an argument, if present.
///
/// JSON-Cadence encoders terminate values with a newline that must not be
/// part of the signed payload until Cadence defines a canonical argument
/// format. Only the last byte is inspected; `"\n"` becomes empty.
pub fn strip_trailing_newline(argument: &mut Vec<u8>) {
    if argument.last() == Some(&ARGUMENT_TRAILING_BYTE) {
        argument.pop();
    }
}

impl PayloadForm {
    pub fn from_transaction(tx: &Transaction) -> Self {
        let proposal_key = tx.proposal_key();
        Self {
            script: tx.script().to_vec(),
            arguments: tx
                .arguments()
                .iter()
                .map(|argument| {
                    let mut argument = argument.clone();
                    strip_trailing_newline(&mut argument);
                    argument
                })
                .collect(),
            reference_block_id: tx.reference_block_id().as_bytes().to_vec(),
            gas_limit: tx.gas_limit(),
            proposal_key_address: proposal_key.address.as_bytes().to_vec(),
            proposal_key_index: u64::from(proposal_key.key_index),
            proposal_key_sequence_number: proposal_key.sequence_number,
            payer: tx.payer().as_bytes().to_vec(),
            authorizers: tx
                .authorizers()
                .iter()
                .map(|a| a.as_bytes().to_vec())
                .collect(),
        }
    }
}

impl EnvelopeForm {
    /// Fails if any payload signature's address is not a signer.
    pub fn from_transaction(tx: &Transaction) -> Result<Self> {
        Ok(Self {
            payload: PayloadForm::from_transaction(tx),
            payload_signatures: signature_forms(tx.payload_signatures())?,
        })
    }
}

impl FullForm {
    /// Fails if any signature of either role has no signer index.
    pub fn from_transaction(tx: &Transaction) -> Result<Self> {
        Ok(Self {
            payload: PayloadForm::from_transaction(tx),
            payload_signatures: signature_forms(tx.payload_signatures())?,
            envelope_signatures: signature_forms(tx.envelope_signatures())?,
        })
    }
}

impl TryFrom<&TransactionSignature> for SignatureForm {
    type Error = TransactionError;

    fn try_from(sig: &TransactionSignature) -> Result<Self> {
        let signer_index = sig.signer_index.ok_or(TransactionError::UnresolvedSigner {
            address: sig.address,
            key_index: sig.key_index,
        })?;
        Ok(Self {
            signer_index: signer_index as u64,
            key_index: u64::from(sig.key_index),
            signature: sig.signature.clone(),
        })
    }
}

fn signature_forms(signatures: &[TransactionSignature]) -> Result<Vec<SignatureForm>> {
    signatures.iter().map(SignatureForm::try_from).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Address, Identifier};

    fn addr(b: u8) -> Address {
        Address::from_bytes(&[b])
    }

    #[test]
    fn strip_removes_exactly_one_newline() {
        let mut a = b"{}\n\n".to_vec();
        strip_trailing_newline(&mut a);
        assert_eq!(a, b"{}\n");

        let mut b = b"{}".to_vec();
        strip_trailing_newline(&mut b);
        assert_eq!(b, b"{}");

        let mut c = vec![10u8];
        strip_trailing_newline(&mut c);
        assert!(c.is_empty());

        let mut d: Vec<u8> = Vec::new();
        strip_trailing_newline(&mut d);
        assert!(d.is_empty());
    }

    #[test]
    fn payload_form_snapshots_fields() {
        let mut tx = Transaction::new();
        tx.set_script(b"transaction{}".to_vec())
            .add_raw_argument(b"{\"type\":\"Int\",\"value\":\"1\"}\n".to_vec())
            .set_reference_block_id(Identifier::from_bytes(&[1]))
            .set_gas_limit(42)
            .set_proposal_key(addr(1), 3, 7)
            .set_payer(addr(2))
            .add_authorizer(addr(3));

        let form = PayloadForm::from_transaction(&tx);
        assert_eq!(form.script, b"transaction{}");
        assert_eq!(form.arguments, vec![b"{\"type\":\"Int\",\"value\":\"1\"}".to_vec()]);
        assert_eq!(form.reference_block_id.len(), 32);
        assert_eq!(form.gas_limit, 42);
        assert_eq!(form.proposal_key_address, addr(1).as_bytes().to_vec());
        assert_eq!(form.proposal_key_index, 3);
        assert_eq!(form.proposal_key_sequence_number, 7);
        assert_eq!(form.payer, addr(2).as_bytes().to_vec());
        assert_eq!(form.authorizers, vec![addr(3).as_bytes().to_vec()]);

        // the snapshot is detached from later mutation
        tx.set_gas_limit(1);
        assert_eq!(form.gas_limit, 42);
    }

    #[test]
    fn payload_form_strips_one_newline_per_snapshot() {
        let mut tx = Transaction::new();
        tx.add_raw_argument(b"x\n\n".to_vec());

        // stored as given, stripped only in the copy
        assert_eq!(tx.arguments(), &[b"x\n\n".to_vec()]);
        assert_eq!(PayloadForm::from_transaction(&tx).arguments, vec![b"x\n".to_vec()]);
        assert_eq!(PayloadForm::from_transaction(&tx).arguments, vec![b"x\n".to_vec()]);
    }

    #[test]
    fn envelope_form_carries_only_payload_signatures() {
        let mut tx = Transaction::new();
        tx.set_proposal_key(addr(1), 0, 0)
            .set_payer(addr(2))
            .add_payload_signature(addr(1), 0, vec![1])
            .add_envelope_signature(addr(2), 0, vec![2]);

        let envelope = EnvelopeForm::from_transaction(&tx).unwrap();
        assert_eq!(envelope.payload_signatures.len(), 1);
        assert_eq!(envelope.payload_signatures[0].signer_index, 0);

        let full = FullForm::from_transaction(&tx).unwrap();
        assert_eq!(full.envelope_signatures.len(), 1);
        assert_eq!(full.envelope_signatures[0].signer_index, 1);
    }

    #[test]
    fn unresolved_signer_is_a_precondition_failure() {
        let mut tx = Transaction::new();
        tx.set_proposal_key(addr(1), 0, 0)
            .add_payload_signature(addr(9), 4, vec![1]);

        match EnvelopeForm::from_transaction(&tx) {
            Err(TransactionError::UnresolvedSigner { address, key_index }) => {
                assert_eq!(address, addr(9));
                assert_eq!(key_index, 4);
            }
            other => panic!("expected UnresolvedSigner, got {other:?}"),
        }
        assert!(FullForm::from_transaction(&tx).is_err());
    }

    #[test]
    fn canonical_form_parts() {
        let form = CanonicalForm::Payload(PayloadForm::default());
        assert_eq!(form.kind(), FormKind::Payload);
        let (_, payload_sigs, envelope_sigs) = form.into_parts();
        assert!(payload_sigs.is_empty() && envelope_sigs.is_empty());
    }
}
