//! # Certificate Issuer
//!
//! Issues a safety check certificate together with its proof-token. One
//! commit creates the certificate, the mint, the device vault, the token
//! metadata and the master edition, and moves the device to the new
//! certificate. If any precondition fails nothing is written.
//!
//! The device is written with a compare-and-swap on the version read at the
//! start of the operation. Two issuers racing on the same device cannot
//! both win: the loser gets [`RegistryError::Conflict`].

use scm_core::{expires_at, Address, DeviceId, SafetyCheckId, SiteId};
use scm_ledger::{CommitReceipt, Transaction};
use serde::{Deserialize, Serialize};

use crate::context::ProgramContext;
use crate::device::DeviceRegistry;
use crate::error::RegistryError;
use crate::inspector::InspectorRegistry;
use crate::policy;
use crate::records::{
    Device, MasterEdition, ProofMint, Record, RecordKind, RecordType, SafetyCheck, TokenMetadata,
    TokenVault,
};
use crate::site::SiteRegistry;

/// Parameters of a certificate issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyCheckRequest {
    /// Site the device is registered under.
    pub site_id: SiteId,
    /// Device being certified.
    pub device_id: DeviceId,
    /// Caller-chosen id, unique per device.
    pub safety_check_id: SafetyCheckId,
    /// Token display name, at most 32 bytes.
    pub name: String,
    /// Token symbol, at most 10 bytes.
    pub symbol: String,
    /// Descriptor location, at most 200 bytes.
    pub uri: String,
    /// Validity period; must be positive.
    pub duration_in_days: i64,
    /// Owner of the inspector record under the device's site.
    pub inspector: Address,
}

/// Result of a successful issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedSafetyCheck {
    /// Address of the certificate record.
    pub address: Address,
    /// The certificate as written.
    pub safety_check: SafetyCheck,
    /// Slot and addresses of the issuing commit.
    pub receipt: CommitReceipt,
}

/// Issues certificates. See the module docs for what one issuance writes.
#[derive(Debug, Clone)]
pub struct CertificateIssuer {
    ctx: ProgramContext,
    sites: SiteRegistry,
    inspectors: InspectorRegistry,
    devices: DeviceRegistry,
}

impl CertificateIssuer {
    /// Issuer over `ctx`.
    pub fn new(ctx: ProgramContext) -> Self {
        Self {
            sites: SiteRegistry::new(ctx.clone()),
            inspectors: InspectorRegistry::new(ctx.clone()),
            devices: DeviceRegistry::new(ctx.clone()),
            ctx,
        }
    }

    /// Issue a certificate for a device.
    ///
    /// # Errors
    ///
    /// In check order: `InvalidDuration`, `InvalidMetadata`, `SiteNotFound`,
    /// `DeviceNotFound`, `InspectorNotFound`, `InspectorSiteMismatch`,
    /// `Unauthorized`, `AlreadyExists`, `DurationOverflow`. A lost race at
    /// commit surfaces as `AlreadyExists` or `Conflict`.
    ///
    /// `Conflict` means another certificate for the same device landed
    /// between the read and the commit. The request itself was valid and
    /// nothing was written, so the caller may resubmit it unchanged.
    pub fn issue(
        &self,
        request: SafetyCheckRequest,
        requester: &Address,
    ) -> Result<IssuedSafetyCheck, RegistryError> {
        if request.duration_in_days <= 0 {
            return Err(RegistryError::InvalidDuration(request.duration_in_days));
        }
        policy::validate_metadata(&request.name, &request.symbol, &request.uri)?;

        let site = self.sites.require(&request.site_id)?;
        let device = self
            .devices
            .require(&request.site_id, &request.device_id)?;
        let inspector = self
            .inspectors
            .require(&request.site_id, &request.inspector)?;
        policy::require_inspector_site(&site.record, &inspector.record)?;
        policy::require_certificate_issuer(&site.record, &inspector.record, requester)?;

        let programs = &self.ctx.programs;
        let check = programs.safety_check_address(
            &request.site_id,
            &request.device_id,
            &request.safety_check_id,
        )?;
        if self.ctx.ledger.contains(&check.address) {
            return Err(RegistryError::AlreadyExists {
                address: check.address,
            });
        }

        let created_at = self.ctx.clock.now();
        let expiry = expires_at(created_at, request.duration_in_days)?;

        let mint = programs.proof_mint_address(&check.address)?;
        let vault = programs.vault_address(&device.address, &mint.address)?;
        let metadata = programs.metadata_address(&mint.address)?;
        let edition = programs.master_edition_address(&mint.address)?;
        tracing::debug!(
            safety_check = %check.address,
            mint = %mint.address,
            vault = %vault.address,
            metadata = %metadata.address,
            edition = %edition.address,
            "derived certificate addresses"
        );

        let safety_check = SafetyCheck {
            site_id: request.site_id,
            device_id: request.device_id,
            safety_check_id: request.safety_check_id,
            inspector: inspector.address,
            duration_in_days: request.duration_in_days,
            created_at,
            expires_at: expiry,
            proof_token: mint.address,
            bump: check.bump,
            mint_bump: mint.bump,
            metadata_bump: metadata.bump,
            master_edition_bump: edition.bump,
        };
        let updated_device = Device {
            last_safety_check: Some(check.address),
            expires_at: Some(expiry),
            ..device.record
        };

        let tx = Transaction::<Record>::new()
            .create(
                check.address,
                RecordKind::SafetyCheck.owner(programs),
                safety_check.clone().into_record(),
            )
            .create(
                mint.address,
                RecordKind::ProofMint.owner(programs),
                ProofMint {
                    decimals: 0,
                    supply: 1,
                    mint_authority: device.address,
                    freeze_authority: Some(device.address),
                }
                .into_record(),
            )
            .create(
                vault.address,
                RecordKind::TokenVault.owner(programs),
                TokenVault {
                    mint: mint.address,
                    owner: device.address,
                    amount: 1,
                }
                .into_record(),
            )
            .create(
                metadata.address,
                RecordKind::TokenMetadata.owner(programs),
                TokenMetadata {
                    mint: mint.address,
                    update_authority: device.address,
                    name: request.name,
                    symbol: request.symbol,
                    uri: request.uri,
                    seller_fee_basis_points: 0,
                }
                .into_record(),
            )
            .create(
                edition.address,
                RecordKind::MasterEdition.owner(programs),
                MasterEdition {
                    mint: mint.address,
                    supply: 0,
                    max_supply: Some(1),
                }
                .into_record(),
            )
            .replace(device.address, device.version, updated_device.into_record());

        let receipt = self.ctx.ledger.commit(tx).map_err(|e| {
            tracing::debug!(safety_check = %check.address, error = %e, "issuance lost a race");
            RegistryError::from(e)
        })?;

        tracing::info!(
            site_id = %safety_check.site_id,
            device_id = %safety_check.device_id,
            safety_check_id = %safety_check.safety_check_id,
            address = %check.address,
            expires_at = expiry,
            slot = receipt.slot,
            "safety check issued"
        );
        Ok(IssuedSafetyCheck {
            address: check.address,
            safety_check,
            receipt,
        })
    }
}
