//! Property-based tests for canonical encoding and signer indexing.

use flow_tx_protocol::transaction::{
    CanonicalForm, FormKind, SignerList, Transaction, TransactionBuilder,
};
use flow_tx_protocol::types::{Address, Identifier};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Addresses drawn from a small pool so that roles collide often.
fn arb_address() -> impl Strategy<Value = Address> {
    (0u8..6).prop_map(|b| Address::from_bytes(&[b]))
}

fn arb_bytes(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..max_len)
}

/// Arguments without a trailing newline, so they survive encoding as is.
fn arb_argument() -> impl Strategy<Value = Vec<u8>> {
    arb_bytes(64).prop_filter("trailing newline", |a| a.last() != Some(&b'\n'))
}

#[derive(Debug, Clone)]
struct Fields {
    script: Vec<u8>,
    arguments: Vec<Vec<u8>>,
    reference_block_id: [u8; 32],
    gas_limit: u64,
    proposer: Address,
    key_index: u32,
    sequence_number: u64,
    payer: Address,
    authorizers: Vec<Address>,
}

fn arb_fields() -> impl Strategy<Value = Fields> {
    (
        arb_bytes(128),
        prop::collection::vec(arb_argument(), 0..4),
        prop::array::uniform32(any::<u8>()),
        any::<u64>(),
        arb_address(),
        any::<u32>(),
        any::<u64>(),
        arb_address(),
        prop::collection::vec(arb_address(), 0..4),
    )
        .prop_map(
            |(
                script,
                arguments,
                reference_block_id,
                gas_limit,
                proposer,
                key_index,
                sequence_number,
                payer,
                authorizers,
            )| Fields {
                script,
                arguments,
                reference_block_id,
                gas_limit,
                proposer,
                key_index,
                sequence_number,
                payer,
                authorizers,
            },
        )
}

fn build(fields: &Fields) -> Transaction {
    let mut builder = TransactionBuilder::new()
        .script(fields.script.clone())
        .reference_block_id(Identifier::new(fields.reference_block_id))
        .gas_limit(fields.gas_limit)
        .proposal_key(fields.proposer, fields.key_index, fields.sequence_number)
        .payer(fields.payer);
    for argument in &fields.arguments {
        builder = builder.argument(argument.clone());
    }
    for authorizer in &fields.authorizers {
        builder = builder.authorizer(*authorizer);
    }
    builder.build()
}

/// (signer pick, key index, signature). The pick selects among the
/// transaction's signers, so every generated signature resolves.
fn arb_signatures() -> impl Strategy<Value = Vec<SignatureSeed>> {
    prop::collection::vec((any::<usize>(), 0u32..4, arb_bytes(72)), 0..6)
}

type SignatureSeed = (usize, u32, Vec<u8>);

fn sign(tx: &mut Transaction, payload: &[SignatureSeed], envelope: &[SignatureSeed]) {
    let signers = tx.signers();
    if signers.is_empty() {
        return;
    }
    for (pick, key, sig) in payload {
        let address = signers.addresses()[pick % signers.len()];
        tx.add_payload_signature(address, *key, sig.clone());
    }
    for (pick, key, sig) in envelope {
        let address = signers.addresses()[pick % signers.len()];
        tx.add_envelope_signature(address, *key, sig.clone());
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn full_encoding_roundtrips(
        fields in arb_fields(),
        payload_sigs in arb_signatures(),
        envelope_sigs in arb_signatures(),
    ) {
        let mut tx = build(&fields);
        sign(&mut tx, &payload_sigs, &envelope_sigs);

        let bytes = tx.encode().unwrap();
        let decoded = Transaction::decode(&bytes).unwrap();
        prop_assert_eq!(&decoded, &tx);
        prop_assert_eq!(decoded.encode().unwrap(), bytes);
    }

    #[test]
    fn trailing_newline_is_dropped_once(
        fields in arb_fields(),
        argument in arb_argument(),
    ) {
        let mut tx = build(&fields);
        let mut with_newline = argument.clone();
        with_newline.push(b'\n');
        tx.add_raw_argument(with_newline);

        let decoded = Transaction::decode(&tx.payload_message()).unwrap();
        prop_assert_eq!(decoded.arguments().last(), Some(&argument));
        prop_assert_eq!(decoded.payload_message(), tx.payload_message());
    }

    #[test]
    fn payload_message_roundtrips_without_signatures(
        fields in arb_fields(),
        payload_sigs in arb_signatures(),
    ) {
        let mut tx = build(&fields);
        sign(&mut tx, &payload_sigs, &[]);

        let bytes = tx.payload_message();
        let form = CanonicalForm::sniff(&bytes).unwrap();
        prop_assert_eq!(form.kind(), FormKind::Payload);

        let decoded = Transaction::from_canonical(form).unwrap();
        prop_assert_eq!(decoded.payload_message(), bytes);
        prop_assert!(decoded.payload_signatures().is_empty());
    }

    #[test]
    fn envelope_message_decodes_as_envelope(
        fields in arb_fields(),
        payload_sigs in arb_signatures(),
    ) {
        let mut tx = build(&fields);
        sign(&mut tx, &payload_sigs, &[]);

        let bytes = tx.envelope_message().unwrap();
        let form = CanonicalForm::sniff(&bytes).unwrap();
        prop_assert_eq!(form.kind(), FormKind::Envelope);

        let decoded = Transaction::from_canonical(form).unwrap();
        prop_assert_eq!(decoded.payload_signatures(), tx.payload_signatures());
        prop_assert!(decoded.envelope_signatures().is_empty());
    }

    #[test]
    fn signature_sequences_stay_sorted(
        fields in arb_fields(),
        payload_sigs in arb_signatures(),
        late_authorizer in arb_address(),
    ) {
        let mut tx = build(&fields);
        sign(&mut tx, &payload_sigs, &[]);
        tx.add_authorizer(late_authorizer);

        let keys: Vec<_> = tx.payload_signatures().iter().map(|s| s.sort_key()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn signer_list_is_a_function_of_final_fields(
        proposer in arb_address(),
        payer in arb_address(),
        authorizers in prop::collection::vec(arb_address(), 0..5),
    ) {
        let mut forwards = Transaction::new();
        forwards.set_proposal_key(proposer, 0, 0).set_payer(payer);
        for a in &authorizers {
            forwards.add_authorizer(*a);
        }

        let mut backwards = Transaction::new();
        for a in &authorizers {
            backwards.add_authorizer(*a);
        }
        backwards.set_payer(payer).set_proposal_key(proposer, 0, 0);

        let expected = SignerList::resolve(&proposer, &payer, &authorizers);
        prop_assert_eq!(forwards.signers(), expected.clone());
        prop_assert_eq!(backwards.signers(), expected);
    }

    #[test]
    fn decode_never_panics(bytes in arb_bytes(256)) {
        let _ = Transaction::decode(&bytes);
    }
}
