//! # Transaction Module
//!
//! Construction, canonical encoding, and signer indexing for Flow
//! transactions. A [`Transaction`] holds a script, its arguments, the
//! accounts involved, and the signatures collected so far; from it the
//! three signable/transportable byte strings are derived.
//!
//! ## Architecture
//!
//! ```text
//! types.rs      - ProposalKey, TransactionSignature, status and result
//! signers.rs    - Deduplicated, ordered signer list
//! signatures.rs - Sorted payload/envelope signature sequences
//! canonical.rs  - Payload, envelope and full form snapshots
//! codec.rs      - RLP encoding and strict decoding of the forms
//! builder.rs    - The Transaction aggregate and TransactionBuilder
//! error.rs      - TransactionError
//! ```
//!
//! ## Signing Lifecycle
//!
//! 1. **Build**: set script, arguments, proposal key, payer, authorizers.
//! 2. **Payload signatures**: proposer and authorizers sign
//!    [`Transaction::payload_message`].
//! 3. **Envelope signatures**: the payer signs
//!    [`Transaction::envelope_message`].
//! 4. **Transport**: [`Transaction::encode`] produces the full form;
//!    [`Transaction::id`] hashes it.
//!
//! ## Design Decisions
//!
//! - Signatures refer to signers by index into the signer list, never by
//!   address. The index is recomputed on every mutation that can move it.
//! - Signature sequences are kept sorted by `(signer_index, key_index)`,
//!   including after re-indexing.
//! - Decoding is strict: trailing bytes and extra list elements are errors.

pub mod builder;
pub mod canonical;
pub mod codec;
pub mod error;
pub mod signatures;
pub mod signers;
pub mod types;

pub use builder::{Transaction, TransactionBuilder};
pub use canonical::{CanonicalForm, EnvelopeForm, FormKind, FullForm, PayloadForm, SignatureForm};
pub use codec::encode_to_vec;
pub use error::TransactionError;
pub use signatures::{SignatureCollection, SignatureRole};
pub use signers::SignerList;
pub use types::{ProposalKey, TransactionResult, TransactionSignature, TransactionStatus};
