//! # Safety Check Program
//!
//! The facade clients use: the four operations plus typed reads of every
//! record the program writes.

use scm_core::{Address, DeviceId, SafetyCheckId, SiteId, UnixTimestamp};
use serde::{Deserialize, Serialize};

use crate::context::{Loaded, ProgramContext};
use crate::device::DeviceRegistry;
use crate::error::RegistryError;
use crate::inspector::InspectorRegistry;
use crate::issuer::{CertificateIssuer, IssuedSafetyCheck, SafetyCheckRequest};
use crate::records::{
    Device, Inspector, MasterEdition, ProofMint, SafetyCheck, Site, TokenMetadata, TokenVault,
};
use crate::site::SiteRegistry;

/// Inspection state of a device at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceStatus {
    /// No certificate has been issued.
    Uninspected,
    /// The latest certificate is still in force.
    Valid {
        /// First second the certificate no longer covers.
        expires_at: UnixTimestamp,
    },
    /// The latest certificate has lapsed.
    Expired {
        /// When it lapsed.
        expired_at: UnixTimestamp,
    },
}

/// Entry point for clients.
#[derive(Debug, Clone)]
pub struct SafetyCheckProgram {
    ctx: ProgramContext,
    sites: SiteRegistry,
    inspectors: InspectorRegistry,
    devices: DeviceRegistry,
    issuer: CertificateIssuer,
}

impl SafetyCheckProgram {
    /// Program over `ctx`. Clones share the ledger.
    pub fn new(ctx: ProgramContext) -> Self {
        Self {
            sites: SiteRegistry::new(ctx.clone()),
            inspectors: InspectorRegistry::new(ctx.clone()),
            devices: DeviceRegistry::new(ctx.clone()),
            issuer: CertificateIssuer::new(ctx.clone()),
            ctx,
        }
    }

    /// Shared handles.
    pub fn context(&self) -> &ProgramContext {
        &self.ctx
    }

    // ── Operations ──────────────────────────────────────────────────

    /// See [`SiteRegistry::create`].
    pub fn create_site(&self, site_id: SiteId, authority: Address) -> Result<Site, RegistryError> {
        self.sites.create(site_id, authority)
    }

    /// See [`InspectorRegistry::create`].
    pub fn create_inspector(
        &self,
        site_id: SiteId,
        owner: Address,
        requester: &Address,
    ) -> Result<Inspector, RegistryError> {
        self.inspectors.create(site_id, owner, requester)
    }

    /// See [`DeviceRegistry::create`].
    pub fn create_device(
        &self,
        site_id: SiteId,
        device_id: DeviceId,
        requester: &Address,
    ) -> Result<Device, RegistryError> {
        self.devices.create(site_id, device_id, requester)
    }

    /// See [`CertificateIssuer::issue`].
    pub fn create_safety_check(
        &self,
        request: SafetyCheckRequest,
        requester: &Address,
    ) -> Result<IssuedSafetyCheck, RegistryError> {
        self.issuer.issue(request, requester)
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Read a site.
    pub fn site(&self, site_id: &SiteId) -> Result<Option<Loaded<Site>>, RegistryError> {
        self.sites.get(site_id)
    }

    /// Read the inspector record of `owner` at a site.
    pub fn inspector(
        &self,
        site_id: &SiteId,
        owner: &Address,
    ) -> Result<Option<Loaded<Inspector>>, RegistryError> {
        self.inspectors.get(site_id, owner)
    }

    /// Read a device.
    pub fn device(
        &self,
        site_id: &SiteId,
        device_id: &DeviceId,
    ) -> Result<Option<Loaded<Device>>, RegistryError> {
        self.devices.get(site_id, device_id)
    }

    /// Read a certificate by its identifiers.
    pub fn safety_check(
        &self,
        site_id: &SiteId,
        device_id: &DeviceId,
        safety_check_id: &SafetyCheckId,
    ) -> Result<Option<Loaded<SafetyCheck>>, RegistryError> {
        let derived = self
            .ctx
            .programs
            .safety_check_address(site_id, device_id, safety_check_id)?;
        self.ctx.load(&derived.address)
    }

    /// Proof mint of the certificate at `safety_check`.
    pub fn proof_mint(&self, safety_check: &Address) -> Result<Option<Loaded<ProofMint>>, RegistryError> {
        let derived = self.ctx.programs.proof_mint_address(safety_check)?;
        self.ctx.load(&derived.address)
    }

    /// Vault of `mint` held by `owner`.
    pub fn token_vault(
        &self,
        owner: &Address,
        mint: &Address,
    ) -> Result<Option<Loaded<TokenVault>>, RegistryError> {
        let derived = self.ctx.programs.vault_address(owner, mint)?;
        self.ctx.load(&derived.address)
    }

    /// Metadata of a proof mint.
    pub fn token_metadata(&self, mint: &Address) -> Result<Option<Loaded<TokenMetadata>>, RegistryError> {
        let derived = self.ctx.programs.metadata_address(mint)?;
        self.ctx.load(&derived.address)
    }

    /// Master edition of a proof mint.
    pub fn master_edition(&self, mint: &Address) -> Result<Option<Loaded<MasterEdition>>, RegistryError> {
        let derived = self.ctx.programs.master_edition_address(mint)?;
        self.ctx.load(&derived.address)
    }

    /// Inspection state of a device at `now`. A certificate is in force up
    /// to, but not including, its expiry second.
    pub fn device_status(
        &self,
        site_id: &SiteId,
        device_id: &DeviceId,
        now: UnixTimestamp,
    ) -> Result<DeviceStatus, RegistryError> {
        let device = self.devices.require(site_id, device_id)?;
        Ok(match device.record.expires_at {
            None => DeviceStatus::Uninspected,
            Some(expires_at) if now < expires_at => DeviceStatus::Valid { expires_at },
            Some(expired_at) => DeviceStatus::Expired { expired_at },
        })
    }
}
