//! # scm CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use scm_cli::address::{run_address, AddressArgs};
use scm_cli::keys::{run_key, KeyArgs};
use scm_cli::records::{
    run_check, run_device, run_inspector, run_site, CheckArgs, DeviceArgs, InspectorArgs,
    SiteArgs,
};
use scm_cli::GlobalOptions;

/// Safety Check Manager
///
/// Registers sites, inspectors and devices, and issues time-bound safety
/// check certificates backed by one-of-one proof-tokens.
#[derive(Parser, Debug)]
#[command(name = "scm", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML file with program ids.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Ledger snapshot file. Created on the first write.
    #[arg(long, global = true, default_value = "scm-ledger.json")]
    ledger: PathBuf,

    /// Fix ledger time to this Unix timestamp instead of the system clock.
    #[arg(long, global = true)]
    now: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ed25519 identity generation.
    Key(KeyArgs),

    /// Derive record addresses.
    Address(AddressArgs),

    /// Create or show sites.
    Site(SiteArgs),

    /// Register or show inspectors.
    Inspector(InspectorArgs),

    /// Register, show or check the status of devices.
    Device(DeviceArgs),

    /// Issue or show safety check certificates.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "scm CLI starting");

    let opts = GlobalOptions {
        config: cli.config,
        ledger: cli.ledger,
        now: cli.now,
    };

    let result = match cli.command {
        Commands::Key(args) => run_key(&args),
        Commands::Address(args) => run_address(&args, &opts),
        Commands::Site(args) => run_site(&args, &opts),
        Commands::Inspector(args) => run_inspector(&args, &opts),
        Commands::Device(args) => run_device(&args, &opts),
        Commands::Check(args) => run_check(&args, &opts),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
