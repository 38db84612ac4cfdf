//! Subcommand implementations.
//!
//! Each command returns the text it would print so that tests can check it
//! without capturing stdout.

use anyhow::{Context, Result};
use serde_json::json;
use std::path::Path;

use flow_tx_protocol::transaction::{CanonicalForm, FormKind, Transaction};

use crate::cli::{DecodeArgs, EncodeArgs, FileArgs};

/// Reads a JSON transaction. Signer indices in the file are recomputed.
pub fn load_transaction(path: &Path) -> Result<Transaction> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transaction file: {}", path.display()))?;
    let tx: Transaction = serde_json::from_str(&raw)
        .with_context(|| format!("invalid transaction JSON in {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        signers = tx.signers().len(),
        "transaction loaded"
    );
    Ok(tx)
}

/// `decode <HEX>`: detected (or required) form plus the transaction.
pub fn decode(args: &DecodeArgs) -> Result<String> {
    let trimmed = args.hex.trim();
    let bytes = hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
        .context("input is not valid hex")?;

    let form = match args.form {
        Some(kind) => CanonicalForm::decode_as(kind.into(), &bytes),
        None => CanonicalForm::sniff(&bytes),
    }
    .context("failed to decode transaction")?;

    let kind = form.kind();
    let tx = Transaction::from_canonical(form).context("failed to resolve signatures")?;
    tracing::info!(form = %kind, bytes = bytes.len(), "decoded transaction");

    let out = json!({
        "form": kind.to_string(),
        "id": tx.id()?.to_hex(),
        "transaction": tx,
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

/// `encode --file <tx.json> [--form ...]`: hex of the chosen message.
pub fn encode(args: &EncodeArgs) -> Result<String> {
    let tx = load_transaction(&args.file)?;
    let kind: FormKind = args.form.into();
    let bytes = match kind {
        FormKind::Payload => tx.payload_message(),
        FormKind::Envelope => tx
            .envelope_message()
            .context("failed to build envelope message")?,
        FormKind::Full => tx.encode().context("failed to encode transaction")?,
    };
    tracing::info!(form = %kind, bytes = bytes.len(), "encoded transaction");
    Ok(hex::encode(bytes))
}

/// `id --file <tx.json>`
pub fn id(args: &FileArgs) -> Result<String> {
    let tx = load_transaction(&args.file)?;
    let id = tx.id().context("failed to compute transaction ID")?;
    Ok(id.to_hex())
}

/// `signers --file <tx.json>`: one `index address` pair per line.
pub fn signers(args: &FileArgs) -> Result<String> {
    let tx = load_transaction(&args.file)?;
    let lines: Vec<String> = tx
        .signers()
        .addresses()
        .iter()
        .enumerate()
        .map(|(i, address)| format!("{i} {address}"))
        .collect();
    Ok(lines.join("\n"))
}
