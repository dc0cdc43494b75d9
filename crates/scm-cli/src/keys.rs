//! # Key Subcommand
//!
//! Ed25519 identities for site authorities and inspectors. The secret seed
//! is written to `<prefix>.key` and the address to `<prefix>.pub`, both as
//! hex.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use scm_core::Address;
use scm_crypto::IdentityKeyPair;
use serde::Serialize;

use crate::workspace::load_identity;

/// Arguments for the `scm key` subcommand.
#[derive(Args, Debug)]
pub struct KeyArgs {
    #[command(subcommand)]
    pub command: KeyCommand,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Generate a new identity.
    Generate {
        /// Output directory for the key files.
        #[arg(long, short, default_value = ".")]
        output: PathBuf,
        /// Prefix for the key filenames.
        #[arg(long, default_value = "scm")]
        prefix: String,
    },
    /// Print the address of an existing key file.
    Show {
        /// Path to the key file.
        #[arg(long)]
        key: PathBuf,
    },
}

/// Paths and address of a generated identity.
#[derive(Debug, Serialize)]
pub struct GeneratedKey {
    pub address: Address,
    pub key_file: PathBuf,
    pub pub_file: PathBuf,
}

pub fn run_key(args: &KeyArgs) -> Result<u8> {
    match &args.command {
        KeyCommand::Generate { output, prefix } => {
            let generated = cmd_generate(output, prefix)?;
            crate::print_json(&generated)?;
        }
        KeyCommand::Show { key } => {
            let identity = load_identity(key)?;
            println!("{}", identity.address());
        }
    }
    Ok(0)
}

pub fn cmd_generate(output_dir: &Path, prefix: &str) -> Result<GeneratedKey> {
    std::fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    let identity = IdentityKeyPair::generate();
    let key_file = output_dir.join(format!("{prefix}.key"));
    let pub_file = output_dir.join(format!("{prefix}.pub"));

    std::fs::write(&key_file, identity.seed_hex())
        .with_context(|| format!("failed to write key file: {}", key_file.display()))?;
    std::fs::write(&pub_file, identity.address().to_hex())
        .with_context(|| format!("failed to write public file: {}", pub_file.display()))?;

    tracing::info!(address = %identity.address(), key_file = %key_file.display(), "identity generated");
    Ok(GeneratedKey {
        address: identity.address(),
        key_file,
        pub_file,
    })
}
