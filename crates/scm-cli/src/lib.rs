//! # scm-cli: Safety Check Manager Command-Line Interface
//!
//! Provides the `scm` binary. The ledger is a JSON snapshot file that is
//! loaded at the start of every command and written back after a
//! successful write. A sidecar `<ledger>.lock` file serializes commands
//! that share a ledger.
//!
//! ## Subcommands
//!
//! - `scm key`: Ed25519 identity generation and inspection.
//! - `scm address`: Derive record addresses without touching the ledger.
//! - `scm site` / `scm inspector` / `scm device` / `scm check`: create and
//!   show records.
//!
//! ```bash
//! scm key generate --prefix authority
//! scm site create --site plant-7 --key authority.key
//! scm device create --site plant-7 --device boiler-2 --key authority.key
//! scm check create --site plant-7 --device boiler-2 --check C1 \
//!     --name "Boiler" --symbol BLR --uri ipfs://boiler --days 30 --key inspector.key
//! ```
//!
//! ## Crate Policy
//!
//! - Handlers delegate to `scm-registry`; no business logic here.
//! - Records are printed as pretty JSON on stdout; diagnostics go through
//!   `tracing` on stderr.

pub mod address;
pub mod keys;
pub mod records;
pub mod workspace;

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// YAML file with program ids.
    pub config: Option<PathBuf>,
    /// Ledger snapshot file.
    pub ledger: PathBuf,
    /// Fixed ledger time in Unix seconds; the system clock when absent.
    pub now: Option<i64>,
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
