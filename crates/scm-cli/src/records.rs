//! # Record Subcommands
//!
//! `site`, `inspector`, `device` and `check`. Every `create` loads the
//! ledger, runs one registry operation as the identity in `--key`, and
//! saves the ledger only if the operation succeeded.

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use scm_core::{Address, DeviceId, SafetyCheckId, SiteId};
use scm_registry::{
    Device, DeviceStatus, Inspector, IssuedSafetyCheck, Loaded, MasterEdition, ProofMint,
    SafetyCheck, SafetyCheckRequest, Site, TokenMetadata,
};
use serde::Serialize;

use crate::workspace::{load_identity, Workspace};
use crate::GlobalOptions;

// ── Sites ───────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct SiteArgs {
    #[command(subcommand)]
    pub command: SiteCommand,
}

#[derive(Subcommand, Debug)]
pub enum SiteCommand {
    /// Create a site; the key's identity becomes its authority.
    Create {
        #[arg(long)]
        site: String,
        /// Key file of the site authority.
        #[arg(long)]
        key: PathBuf,
    },
    /// Print a site.
    Show {
        #[arg(long)]
        site: String,
    },
}

pub fn run_site(args: &SiteArgs, opts: &GlobalOptions) -> Result<u8> {
    let ws = Workspace::open(opts)?;
    match &args.command {
        SiteCommand::Create { site, key } => {
            let authority = load_identity(key)?.address();
            let created = cmd_create_site(&ws, site, authority)?;
            ws.save()?;
            crate::print_json(&created)?;
        }
        SiteCommand::Show { site } => crate::print_json(&cmd_show_site(&ws, site)?)?,
    }
    Ok(0)
}

pub fn cmd_create_site(ws: &Workspace, site: &str, authority: Address) -> Result<Site> {
    Ok(ws.program().create_site(SiteId::new(site)?, authority)?)
}

pub fn cmd_show_site(ws: &Workspace, site: &str) -> Result<Loaded<Site>> {
    ws.program()
        .site(&SiteId::new(site)?)?
        .ok_or_else(|| anyhow!("site {site} not found"))
}

// ── Inspectors ──────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct InspectorArgs {
    #[command(subcommand)]
    pub command: InspectorCommand,
}

#[derive(Subcommand, Debug)]
pub enum InspectorCommand {
    /// Register an inspector under a site.
    Create {
        #[arg(long)]
        site: String,
        /// Inspector owner address (hex).
        #[arg(long)]
        owner: Address,
        /// Key file of the site authority.
        #[arg(long)]
        key: PathBuf,
    },
    /// Print an inspector.
    Show {
        #[arg(long)]
        site: String,
        #[arg(long)]
        owner: Address,
    },
}

pub fn run_inspector(args: &InspectorArgs, opts: &GlobalOptions) -> Result<u8> {
    let ws = Workspace::open(opts)?;
    match &args.command {
        InspectorCommand::Create { site, owner, key } => {
            let requester = load_identity(key)?.address();
            let created = cmd_create_inspector(&ws, site, *owner, &requester)?;
            ws.save()?;
            crate::print_json(&created)?;
        }
        InspectorCommand::Show { site, owner } => {
            let loaded = ws
                .program()
                .inspector(&SiteId::new(site.as_str())?, owner)?
                .ok_or_else(|| anyhow!("inspector {owner} not found at site {site}"))?;
            crate::print_json(&loaded)?;
        }
    }
    Ok(0)
}

pub fn cmd_create_inspector(
    ws: &Workspace,
    site: &str,
    owner: Address,
    requester: &Address,
) -> Result<Inspector> {
    Ok(ws
        .program()
        .create_inspector(SiteId::new(site)?, owner, requester)?)
}

// ── Devices ─────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommand {
    /// Register a device under a site.
    Create {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
        /// Key file of the site authority.
        #[arg(long)]
        key: PathBuf,
    },
    /// Print a device.
    Show {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
    },
    /// Print whether the device holds a certificate in force.
    Status {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
    },
}

pub fn run_device(args: &DeviceArgs, opts: &GlobalOptions) -> Result<u8> {
    let ws = Workspace::open(opts)?;
    match &args.command {
        DeviceCommand::Create { site, device, key } => {
            let requester = load_identity(key)?.address();
            let created = cmd_create_device(&ws, site, device, &requester)?;
            ws.save()?;
            crate::print_json(&created)?;
        }
        DeviceCommand::Show { site, device } => {
            let loaded = ws
                .program()
                .device(&SiteId::new(site.as_str())?, &DeviceId::new(device.as_str())?)?
                .ok_or_else(|| anyhow!("device {device} not found at site {site}"))?;
            crate::print_json(&loaded)?;
        }
        DeviceCommand::Status { site, device } => {
            crate::print_json(&cmd_device_status(&ws, site, device)?)?;
        }
    }
    Ok(0)
}

pub fn cmd_create_device(
    ws: &Workspace,
    site: &str,
    device: &str,
    requester: &Address,
) -> Result<Device> {
    Ok(ws
        .program()
        .create_device(SiteId::new(site)?, DeviceId::new(device)?, requester)?)
}

pub fn cmd_device_status(ws: &Workspace, site: &str, device: &str) -> Result<DeviceStatus> {
    let now = ws.program().context().clock.now();
    Ok(ws
        .program()
        .device_status(&SiteId::new(site)?, &DeviceId::new(device)?, now)?)
}

// ── Certificates ────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(subcommand)]
    pub command: CheckCommand,
}

#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Issue a safety check certificate and its proof-token.
    Create {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
        #[arg(long)]
        check: String,
        /// Token display name (at most 32 bytes).
        #[arg(long)]
        name: String,
        /// Token symbol (at most 10 bytes).
        #[arg(long)]
        symbol: String,
        /// Descriptor URI (at most 200 bytes).
        #[arg(long)]
        uri: String,
        /// Validity in days.
        #[arg(long)]
        days: i64,
        /// Inspector owner address (hex); defaults to the key's identity.
        #[arg(long)]
        inspector: Option<Address>,
        /// Key file of the inspector or the site authority.
        #[arg(long)]
        key: PathBuf,
    },
    /// Print a certificate with its proof-token records.
    Show {
        #[arg(long)]
        site: String,
        #[arg(long)]
        device: String,
        #[arg(long)]
        check: String,
    },
}

/// A certificate together with the token records issued with it.
#[derive(Debug, Serialize)]
pub struct CertificateView {
    pub safety_check: Loaded<SafetyCheck>,
    pub proof_mint: Option<Loaded<ProofMint>>,
    pub token_metadata: Option<Loaded<TokenMetadata>>,
    pub master_edition: Option<Loaded<MasterEdition>>,
}

pub fn run_check(args: &CheckArgs, opts: &GlobalOptions) -> Result<u8> {
    let ws = Workspace::open(opts)?;
    match &args.command {
        CheckCommand::Create {
            site,
            device,
            check,
            name,
            symbol,
            uri,
            days,
            inspector,
            key,
        } => {
            let requester = load_identity(key)?.address();
            let request = SafetyCheckRequest {
                site_id: SiteId::new(site.as_str())?,
                device_id: DeviceId::new(device.as_str())?,
                safety_check_id: SafetyCheckId::new(check.as_str())?,
                name: name.clone(),
                symbol: symbol.clone(),
                uri: uri.clone(),
                duration_in_days: *days,
                inspector: inspector.unwrap_or(requester),
            };
            let issued = cmd_create_check(&ws, request, &requester)?;
            ws.save()?;
            crate::print_json(&issued)?;
        }
        CheckCommand::Show {
            site,
            device,
            check,
        } => crate::print_json(&cmd_show_check(&ws, site, device, check)?)?,
    }
    Ok(0)
}

pub fn cmd_create_check(
    ws: &Workspace,
    request: SafetyCheckRequest,
    requester: &Address,
) -> Result<IssuedSafetyCheck> {
    Ok(ws.program().create_safety_check(request, requester)?)
}

pub fn cmd_show_check(
    ws: &Workspace,
    site: &str,
    device: &str,
    check: &str,
) -> Result<CertificateView> {
    let program = ws.program();
    let safety_check = program
        .safety_check(
            &SiteId::new(site)?,
            &DeviceId::new(device)?,
            &SafetyCheckId::new(check)?,
        )?
        .ok_or_else(|| anyhow!("safety check {check} not found for device {device} at site {site}"))?;
    let mint = safety_check.record.proof_token;
    Ok(CertificateView {
        proof_mint: program.proof_mint(&safety_check.address)?,
        token_metadata: program.token_metadata(&mint)?,
        master_edition: program.master_edition(&mint)?,
        safety_check,
    })
}
