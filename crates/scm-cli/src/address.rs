//! # Address Subcommand
//!
//! Derives record addresses from identifiers. Reads the program ids but
//! never the ledger.

use anyhow::Result;
use clap::{Args, Subcommand};
use scm_core::{Address, DeviceId, SafetyCheckId, SiteId};
use scm_registry::{DerivedAddress, ProgramIds};

use crate::workspace::load_programs;
use crate::GlobalOptions;

#[derive(Args, Debug)]
pub struct AddressArgs {
    #[command(subcommand)]
    pub command: AddressCommand,
}

#[derive(Subcommand, Debug)]
pub enum AddressCommand {
    /// Address of a site.
    Site {
        #[arg(long)]
        site: String,
    },
    /// Address of an inspector.
    Inspector {
        #[arg(long)]
        site: String,
        /// Inspector owner address (hex).
        #[arg(long)]
        owner: Address,
    },
    /// Address of a device.
    Device {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
    },
    /// Address of a certificate.
    Check {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
        #[arg(long)]
        check: String,
    },
    /// Address of the proof mint of a certificate.
    Mint {
        /// Certificate address (hex).
        #[arg(long)]
        safety_check: Address,
    },
}

pub fn run_address(args: &AddressArgs, opts: &GlobalOptions) -> Result<u8> {
    let programs = load_programs(opts.config.as_deref())?;
    let derived = derive(&args.command, &programs)?;
    crate::print_json(&derived)?;
    Ok(0)
}

pub fn derive(command: &AddressCommand, programs: &ProgramIds) -> Result<DerivedAddress> {
    let derived = match command {
        AddressCommand::Site { site } => programs.site_address(&SiteId::new(site.as_str())?)?,
        AddressCommand::Inspector { site, owner } => {
            programs.inspector_address(&SiteId::new(site.as_str())?, owner)?
        }
        AddressCommand::Device { site, device } => programs.device_address(
            &SiteId::new(site.as_str())?,
            &DeviceId::new(device.as_str())?,
        )?,
        AddressCommand::Check {
            site,
            device,
            check,
        } => programs.safety_check_address(
            &SiteId::new(site.as_str())?,
            &DeviceId::new(device.as_str())?,
            &SafetyCheckId::new(check.as_str())?,
        )?,
        AddressCommand::Mint { safety_check } => programs.proof_mint_address(safety_check)?,
    };
    Ok(derived)
}
