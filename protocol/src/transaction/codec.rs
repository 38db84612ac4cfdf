//! RLP encoding and decoding of the canonical forms.
//!
//! Encoding is plain RLP: byte strings with length prefixes, unsigned
//! integers as minimal big-endian byte strings, structures as lists of
//! their fields in declaration order. Equal forms always encode to equal
//! bytes.
//!
//! Decoding comes in two flavours:
//!
//! - [`CanonicalForm::decode_as`] decodes the shape the caller names and
//!   rejects anything else.
//! - [`CanonicalForm::sniff`] works out the shape from the bytes. The first
//!   field of a payload is always a byte string (the script), while the
//!   first field of an envelope or full form is always the payload list, so
//!   the kind of the first inner element tells them apart. Envelope and full
//!   differ only in whether a third element follows the payload signatures.
//!
//! Both reject trailing bytes after the top-level value and extra elements
//! inside any canonical list.

use alloy_rlp::{length_of_length, BufMut, Decodable, Encodable, Header};

use super::canonical::{CanonicalForm, EnvelopeForm, FormKind, FullForm, PayloadForm, SignatureForm};
use super::error::{Result, TransactionError};
use crate::config::RLP_LIST_THRESHOLD;

// ---------------------------------------------------------------------------
// Encoding helpers
// ---------------------------------------------------------------------------

/// Encodes any RLP value into a fresh buffer of exactly the right size.
pub fn encode_to_vec<T: Encodable>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.length());
    value.encode(&mut out);
    out
}

fn bytes_length(bytes: &[u8]) -> usize {
    Encodable::length(bytes)
}

fn list_length(payload_length: usize) -> usize {
    length_of_length(payload_length) + payload_length
}

fn list_header(payload_length: usize) -> Header {
    Header {
        list: true,
        payload_length,
    }
}

fn bytes_list_payload_length(items: &[Vec<u8>]) -> usize {
    items.iter().map(|item| bytes_length(item)).sum()
}

fn encode_bytes_list(items: &[Vec<u8>], out: &mut dyn BufMut) {
    list_header(bytes_list_payload_length(items)).encode(out);
    for item in items {
        <[u8] as Encodable>::encode(item, out);
    }
}

fn signature_list_payload_length(sigs: &[SignatureForm]) -> usize {
    sigs.iter().map(Encodable::length).sum()
}

fn encode_signature_list(sigs: &[SignatureForm], out: &mut dyn BufMut) {
    list_header(signature_list_payload_length(sigs)).encode(out);
    for sig in sigs {
        sig.encode(out);
    }
}

// ---------------------------------------------------------------------------
// Encodable impls
// ---------------------------------------------------------------------------

impl PayloadForm {
    fn payload_length(&self) -> usize {
        bytes_length(&self.script)
            + list_length(bytes_list_payload_length(&self.arguments))
            + bytes_length(&self.reference_block_id)
            + self.gas_limit.length()
            + bytes_length(&self.proposal_key_address)
            + self.proposal_key_index.length()
            + self.proposal_key_sequence_number.length()
            + bytes_length(&self.payer)
            + list_length(bytes_list_payload_length(&self.authorizers))
    }
}

impl Encodable for PayloadForm {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.payload_length()).encode(out);
        <[u8] as Encodable>::encode(&self.script, out);
        encode_bytes_list(&self.arguments, out);
        <[u8] as Encodable>::encode(&self.reference_block_id, out);
        self.gas_limit.encode(out);
        <[u8] as Encodable>::encode(&self.proposal_key_address, out);
        self.proposal_key_index.encode(out);
        self.proposal_key_sequence_number.encode(out);
        <[u8] as Encodable>::encode(&self.payer, out);
        encode_bytes_list(&self.authorizers, out);
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl SignatureForm {
    fn payload_length(&self) -> usize {
        self.signer_index.length() + self.key_index.length() + bytes_length(&self.signature)
    }
}

impl Encodable for SignatureForm {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.payload_length()).encode(out);
        self.signer_index.encode(out);
        self.key_index.encode(out);
        <[u8] as Encodable>::encode(&self.signature, out);
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl EnvelopeForm {
    fn payload_length(&self) -> usize {
        self.payload.length()
            + list_length(signature_list_payload_length(&self.payload_signatures))
    }
}

impl Encodable for EnvelopeForm {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.payload_length()).encode(out);
        self.payload.encode(out);
        encode_signature_list(&self.payload_signatures, out);
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl FullForm {
    fn payload_length(&self) -> usize {
        self.payload.length()
            + list_length(signature_list_payload_length(&self.payload_signatures))
            + list_length(signature_list_payload_length(&self.envelope_signatures))
    }
}

impl Encodable for FullForm {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.payload_length()).encode(out);
        self.payload.encode(out);
        encode_signature_list(&self.payload_signatures, out);
        encode_signature_list(&self.envelope_signatures, out);
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl Encodable for CanonicalForm {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            Self::Payload(p) => p.encode(out),
            Self::Envelope(e) => e.encode(out),
            Self::Full(f) => f.encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            Self::Payload(p) => p.length(),
            Self::Envelope(e) => e.length(),
            Self::Full(f) => f.length(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decoding helpers
// ---------------------------------------------------------------------------

/// Returns `true` if the next item in `buf` is a list.
fn next_is_list(buf: &[u8]) -> Option<bool> {
    buf.first().map(|b| *b >= RLP_LIST_THRESHOLD)
}

/// Consumes a list header and returns the list's payload, advancing `buf`
/// past the whole list.
fn take_list<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(TransactionError::UnexpectedKind { expected: "list" });
    }
    take_payload(buf, header.payload_length)
}

fn take_bytes(buf: &mut &[u8]) -> Result<Vec<u8>> {
    let header = Header::decode(buf)?;
    if header.list {
        return Err(TransactionError::UnexpectedKind {
            expected: "byte string",
        });
    }
    take_payload(buf, header.payload_length).map(<[u8]>::to_vec)
}

fn take_payload<'a>(buf: &mut &'a [u8], len: usize) -> Result<&'a [u8]> {
    if buf.len() < len {
        return Err(alloy_rlp::Error::InputTooShort.into());
    }
    let (payload, rest) = buf.split_at(len);
    *buf = rest;
    Ok(payload)
}

fn take_bytes_list(buf: &mut &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut items = take_list(buf)?;
    let mut out = Vec::new();
    while !items.is_empty() {
        out.push(take_bytes(&mut items)?);
    }
    Ok(out)
}

fn take_signature_list(buf: &mut &[u8]) -> Result<Vec<SignatureForm>> {
    let mut items = take_list(buf)?;
    let mut out = Vec::new();
    while !items.is_empty() {
        out.push(SignatureForm::decode_from(&mut items)?);
    }
    Ok(out)
}

fn ensure_consumed(rest: &[u8]) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(TransactionError::TrailingData(rest.len()))
    }
}

/// Runs `decode` over the whole of `bytes`, rejecting trailing input.
fn decode_exact<T>(bytes: &[u8], decode: impl FnOnce(&mut &[u8]) -> Result<T>) -> Result<T> {
    if bytes.is_empty() {
        return Err(TransactionError::EmptyInput);
    }
    let mut cursor = bytes;
    let value = decode(&mut cursor)?;
    ensure_consumed(cursor)?;
    Ok(value)
}

// ---------------------------------------------------------------------------
// Form decoders
// ---------------------------------------------------------------------------

impl PayloadForm {
    /// Decodes a payload list from the front of `buf`, advancing it.
    pub fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        let mut fields = take_list(buf)?;
        let form = Self {
            script: take_bytes(&mut fields)?,
            arguments: take_bytes_list(&mut fields)?,
            reference_block_id: take_bytes(&mut fields)?,
            gas_limit: u64::decode(&mut fields)?,
            proposal_key_address: take_bytes(&mut fields)?,
            proposal_key_index: u64::decode(&mut fields)?,
            proposal_key_sequence_number: u64::decode(&mut fields)?,
            payer: take_bytes(&mut fields)?,
            authorizers: take_bytes_list(&mut fields)?,
        };
        ensure_consumed(fields)?;
        Ok(form)
    }

    /// Decodes exactly one payload form spanning all of `bytes`.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes, Self::decode_from)
    }
}

impl SignatureForm {
    pub fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        let mut fields = take_list(buf)?;
        let form = Self {
            signer_index: u64::decode(&mut fields)?,
            key_index: u64::decode(&mut fields)?,
            signature: take_bytes(&mut fields)?,
        };
        ensure_consumed(fields)?;
        Ok(form)
    }
}

impl EnvelopeForm {
    pub fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        let mut fields = take_list(buf)?;
        let form = Self {
            payload: PayloadForm::decode_from(&mut fields)?,
            payload_signatures: take_signature_list(&mut fields)?,
        };
        ensure_consumed(fields)?;
        Ok(form)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes, Self::decode_from)
    }
}

impl FullForm {
    pub fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        let mut fields = take_list(buf)?;
        let form = Self {
            payload: PayloadForm::decode_from(&mut fields)?,
            payload_signatures: take_signature_list(&mut fields)?,
            envelope_signatures: take_signature_list(&mut fields)?,
        };
        ensure_consumed(fields)?;
        Ok(form)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        decode_exact(bytes, Self::decode_from)
    }
}

impl CanonicalForm {
    /// Strict decode of the named shape.
    pub fn decode_as(kind: FormKind, bytes: &[u8]) -> Result<Self> {
        match kind {
            FormKind::Payload => PayloadForm::decode(bytes).map(Self::Payload),
            FormKind::Envelope => EnvelopeForm::decode(bytes).map(Self::Envelope),
            FormKind::Full => FullForm::decode(bytes).map(Self::Full),
        }
    }

    /// Decodes bytes produced by any of the three encoders, detecting which.
    ///
    /// 1. The outer item must be a list.
    /// 2. If its first element is not a list, the bytes are a bare payload
    ///    and are decoded again from offset zero as one.
    /// 3. Otherwise decode the payload, then the payload signatures.
    /// 4. If the outer list ends there, it was an envelope; if another
    ///    element follows, it holds the envelope signatures of a full form.
    pub fn sniff(bytes: &[u8]) -> Result<Self> {
        match next_is_list(bytes) {
            None => return Err(TransactionError::EmptyInput),
            Some(false) => return Err(TransactionError::UnexpectedKind { expected: "list" }),
            Some(true) => {}
        }

        let mut cursor = bytes;
        let mut outer = take_list(&mut cursor)?;

        match next_is_list(outer) {
            None => return Err(alloy_rlp::Error::InputTooShort.into()),
            Some(false) => {
                tracing::debug!(len = bytes.len(), "detected payload form");
                return PayloadForm::decode(bytes).map(Self::Payload);
            }
            Some(true) => {}
        }

        let payload = PayloadForm::decode_from(&mut outer)?;
        let payload_signatures = take_signature_list(&mut outer)?;

        let form = if outer.is_empty() {
            tracing::debug!(
                len = bytes.len(),
                payload_signatures = payload_signatures.len(),
                "detected envelope form"
            );
            Self::Envelope(EnvelopeForm {
                payload,
                payload_signatures,
            })
        } else {
            let envelope_signatures = take_signature_list(&mut outer)?;
            ensure_consumed(outer)?;
            tracing::debug!(
                len = bytes.len(),
                payload_signatures = payload_signatures.len(),
                envelope_signatures = envelope_signatures.len(),
                "detected full form"
            );
            Self::Full(FullForm {
                payload,
                payload_signatures,
                envelope_signatures,
            })
        };

        ensure_consumed(cursor)?;
        Ok(form)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_payload() -> PayloadForm {
        PayloadForm {
            script: b"transaction{}".to_vec(),
            arguments: vec![b"{\"type\":\"Int\",\"value\":\"1\"}".to_vec()],
            reference_block_id: vec![0u8; 32],
            gas_limit: 100,
            proposal_key_address: vec![0, 0, 0, 0, 0, 0, 0, 1],
            proposal_key_index: 0,
            proposal_key_sequence_number: 5,
            payer: vec![0, 0, 0, 0, 0, 0, 0, 1],
            authorizers: vec![vec![0, 0, 0, 0, 0, 0, 0, 1]],
        }
    }

    fn sig(signer_index: u64, key_index: u64) -> SignatureForm {
        SignatureForm {
            signer_index,
            key_index,
            signature: vec![9],
        }
    }

    #[test]
    fn length_matches_encoded_size() {
        let full = FullForm {
            payload: sample_payload(),
            payload_signatures: vec![sig(0, 0), sig(0, 1)],
            envelope_signatures: vec![sig(1, 0)],
        };
        assert_eq!(encode_to_vec(&full).len(), full.length());
        assert_eq!(encode_to_vec(&full.payload).len(), full.payload.length());
    }

    #[test]
    fn signature_encoding_is_exact() {
        // [0, 1, 0x09] -> c3 80 01 09
        assert_eq!(encode_to_vec(&sig(0, 1)), vec![0xc3, 0x80, 0x01, 0x09]);
    }

    #[test]
    fn empty_payload_encoding_is_exact() {
        // nine fields: five empty strings, two empty lists, two zero integers
        let bytes = encode_to_vec(&PayloadForm::default());
        assert_eq!(
            bytes,
            vec![0xc9, 0x80, 0xc0, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0xc0]
        );
    }

    #[test]
    fn sniff_detects_each_form() {
        let payload = sample_payload();
        let envelope = EnvelopeForm {
            payload: payload.clone(),
            payload_signatures: vec![sig(0, 0)],
        };
        let full = FullForm {
            payload: payload.clone(),
            payload_signatures: vec![sig(0, 0)],
            envelope_signatures: vec![],
        };

        let p = CanonicalForm::sniff(&encode_to_vec(&payload)).unwrap();
        let e = CanonicalForm::sniff(&encode_to_vec(&envelope)).unwrap();
        let f = CanonicalForm::sniff(&encode_to_vec(&full)).unwrap();

        assert_eq!(p, CanonicalForm::Payload(payload));
        assert_eq!(e, CanonicalForm::Envelope(envelope));
        assert_eq!(f, CanonicalForm::Full(full));
    }

    #[test]
    fn sniff_envelope_with_no_signatures() {
        let envelope = EnvelopeForm {
            payload: PayloadForm::default(),
            payload_signatures: vec![],
        };
        let form = CanonicalForm::sniff(&encode_to_vec(&envelope)).unwrap();
        assert_eq!(form.kind(), FormKind::Envelope);
    }

    #[test]
    fn decode_as_is_strict_about_shape() {
        let envelope = EnvelopeForm {
            payload: sample_payload(),
            payload_signatures: vec![sig(0, 0)],
        };
        let bytes = encode_to_vec(&envelope);

        assert!(CanonicalForm::decode_as(FormKind::Envelope, &bytes).is_ok());
        assert!(CanonicalForm::decode_as(FormKind::Payload, &bytes).is_err());
        assert!(CanonicalForm::decode_as(FormKind::Full, &bytes).is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            CanonicalForm::sniff(&[]),
            Err(TransactionError::EmptyInput)
        ));
        assert!(matches!(
            PayloadForm::decode(&[]),
            Err(TransactionError::EmptyInput)
        ));
    }

    #[test]
    fn rejects_non_list_outer_item() {
        assert!(matches!(
            CanonicalForm::sniff(&[0x83, b'a', b'b', b'c']),
            Err(TransactionError::UnexpectedKind { expected: "list" })
        ));
    }

    #[test]
    fn rejects_empty_outer_list() {
        assert!(matches!(
            CanonicalForm::sniff(&[0xc0]),
            Err(TransactionError::Rlp(alloy_rlp::Error::InputTooShort))
        ));
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = encode_to_vec(&sample_payload());
        bytes.push(0x00);
        assert!(matches!(
            CanonicalForm::sniff(&bytes),
            Err(TransactionError::TrailingData(1))
        ));
    }

    #[test]
    fn rejects_extra_outer_elements() {
        let full = FullForm {
            payload: sample_payload(),
            payload_signatures: vec![],
            envelope_signatures: vec![],
        };
        let mut inner = Vec::new();
        full.payload.encode(&mut inner);
        encode_signature_list(&[], &mut inner);
        encode_signature_list(&[], &mut inner);
        encode_signature_list(&[], &mut inner);
        let mut bytes = Vec::new();
        list_header(inner.len()).encode(&mut bytes);
        bytes.extend_from_slice(&inner);

        assert!(matches!(
            CanonicalForm::sniff(&bytes),
            Err(TransactionError::TrailingData(1))
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let bytes = encode_to_vec(&sample_payload());
        let truncated = &bytes[..bytes.len() - 3];
        assert!(matches!(
            CanonicalForm::sniff(truncated),
            Err(TransactionError::Rlp(_))
        ));
    }

    #[test]
    fn rejects_payload_with_missing_fields() {
        // [script, [args]] only
        let bytes = vec![0xc2, 0x80, 0xc0];
        assert!(matches!(
            CanonicalForm::sniff(&bytes),
            Err(TransactionError::Rlp(alloy_rlp::Error::InputTooShort))
        ));
    }

    #[test]
    fn rejects_list_where_script_expected_in_envelope() {
        // [[[]], []] - payload list whose script field is a list
        let bytes = vec![0xc3, 0xc1, 0xc0, 0xc0];
        assert!(matches!(
            CanonicalForm::sniff(&bytes),
            Err(TransactionError::UnexpectedKind {
                expected: "byte string"
            })
        ));
    }

    #[test]
    fn rejects_non_canonical_integer() {
        let mut payload = PayloadForm::default();
        payload.gas_limit = 0;
        let mut bytes = encode_to_vec(&payload);
        // gas limit sits after script (0x80), args (0xc0), ref block (0x80)
        assert_eq!(bytes[4], 0x80);
        bytes[4] = 0x00;
        assert!(matches!(
            PayloadForm::decode(&bytes),
            Err(TransactionError::Rlp(_))
        ));
    }
}
