//! # CLI Interface
//!
//! Defines the command-line argument structure for `flow-tx` using `clap`
//! derive. Supports five subcommands: `decode`, `encode`, `id`, `signers`,
//! and `version`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use flow_tx_protocol::transaction::FormKind;

use crate::logging::LogFormat;

/// Flow transaction encoding tool.
///
/// Builds the exact byte strings that proposers, authorizers and payers
/// sign, and decodes any of them back into a readable transaction.
#[derive(Parser, Debug)]
#[command(
    name = "flow-tx",
    about = "Encode, decode and inspect Flow transactions",
    version,
    propagate_version = true
)]
pub struct FlowTxCli {
    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "FLOW_TX_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format.
    #[arg(long, global = true, env = "FLOW_TX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a hex-encoded payload, envelope or full transaction.
    Decode(DecodeArgs),
    /// Encode a JSON transaction file as a canonical message.
    Encode(EncodeArgs),
    /// Print the transaction ID of a JSON transaction file.
    Id(FileArgs),
    /// Print the deduplicated signer list of a JSON transaction file.
    Signers(FileArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `decode` subcommand.
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Hex-encoded bytes, with or without a `0x` prefix.
    pub hex: String,

    /// Require this form instead of detecting it.
    #[arg(long, value_enum)]
    pub form: Option<FormArg>,
}

/// Arguments for the `encode` subcommand.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Path to a JSON transaction.
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Which canonical message to produce.
    #[arg(long, value_enum, default_value_t = FormArg::Full)]
    pub form: FormArg,
}

/// Arguments shared by commands that only read a transaction file.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Path to a JSON transaction.
    #[arg(long, short = 'f')]
    pub file: PathBuf,
}

/// Canonical form selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormArg {
    Payload,
    Envelope,
    Full,
}

impl From<FormArg> for FormKind {
    fn from(arg: FormArg) -> Self {
        match arg {
            FormArg::Payload => FormKind::Payload,
            FormArg::Envelope => FormKind::Envelope,
            FormArg::Full => FormKind::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        FlowTxCli::command().debug_assert();
    }

    #[test]
    fn encode_defaults_to_full_form() {
        let cli = FlowTxCli::parse_from(["flow-tx", "encode", "--file", "tx.json"]);
        match cli.command {
            Commands::Encode(args) => {
                assert_eq!(args.form, FormArg::Full);
                assert_eq!(args.file, PathBuf::from("tx.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_log_flags_follow_subcommand() {
        let cli = FlowTxCli::parse_from([
            "flow-tx",
            "decode",
            "c0",
            "--form",
            "envelope",
            "--log-format",
            "json",
            "--log-level",
            "debug",
        ]);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Decode(args) => {
                assert_eq!(args.hex, "c0");
                assert_eq!(args.form.map(FormKind::from), Some(FormKind::Envelope));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
