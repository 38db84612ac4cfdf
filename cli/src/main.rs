// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Flow Transaction Tool
//!
//! Entry point for the `flow-tx` binary. Parses CLI arguments, initializes
//! logging, and dispatches to a subcommand.
//!
//! The binary supports five subcommands:
//!
//! - `decode`  - decode hex bytes of any canonical form
//! - `encode`  - encode a JSON transaction as payload, envelope or full
//! - `id`      - print a transaction's ID
//! - `signers` - print a transaction's signer list
//! - `version` - print build version information

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Commands, FlowTxCli};

fn main() -> Result<()> {
    let cli = FlowTxCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let output = match cli.command {
        Commands::Decode(args) => commands::decode(&args)?,
        Commands::Encode(args) => commands::encode(&args)?,
        Commands::Id(args) => commands::id(&args)?,
        Commands::Signers(args) => commands::signers(&args)?,
        Commands::Version => version(),
    };

    println!("{output}");
    Ok(())
}

fn version() -> String {
    format!(
        "flow-tx {}\nrustc   {}",
        env!("CARGO_PKG_VERSION"),
        option_env!("RUSTC_VERSION").unwrap_or("unknown")
    )
}
