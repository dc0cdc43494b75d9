//! # Address Seed Table
//!
//! The single place where the registry turns identifiers into addresses.
//! Every call site derives through these methods, so the seed layout
//! cannot drift between the write path, the read path, and clients.
//!
//! | Record | Namespace | Seeds |
//! |---|---|---|
//! | Site | registry | `"site"`, site id |
//! | Inspector | registry | `"inspector"`, site id, owner |
//! | Device | registry | `"device"`, site id, device id |
//! | SafetyCheck | registry | `"safety_check"`, site id, device id, safety check id |
//! | ProofMint | registry | `"safety_check_mint"`, safety check address |
//! | TokenVault | associated token | device address, token program, mint |
//! | TokenMetadata | metadata | `"metadata"`, metadata program, mint |
//! | MasterEdition | metadata | `"metadata"`, metadata program, mint, `"edition"` |

use scm_core::{Address, DeviceId, SafetyCheckId, SiteId};
use scm_crypto::{find_address, DerivationError};
use serde::{Deserialize, Serialize};

use crate::config::ProgramIds;

/// Prefix of site addresses.
pub const SITE_SEED: &[u8] = b"site";
/// Prefix of inspector addresses.
pub const INSPECTOR_SEED: &[u8] = b"inspector";
/// Prefix of device addresses.
pub const DEVICE_SEED: &[u8] = b"device";
/// Prefix of certificate addresses.
pub const SAFETY_CHECK_SEED: &[u8] = b"safety_check";
/// Prefix of proof mint addresses.
pub const SAFETY_CHECK_MINT_SEED: &[u8] = b"safety_check_mint";
/// Prefix of metadata and master edition addresses.
pub const METADATA_SEED: &[u8] = b"metadata";
/// Suffix of master edition addresses.
pub const EDITION_SEED: &[u8] = b"edition";

/// A derived address together with the bump that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddress {
    /// The off-curve address.
    pub address: Address,
    /// Highest bump that yields an off-curve address.
    pub bump: u8,
}

fn derive(seeds: &[&[u8]], namespace: &Address) -> Result<DerivedAddress, DerivationError> {
    let (address, bump) = find_address(seeds, namespace)?;
    Ok(DerivedAddress { address, bump })
}

impl ProgramIds {
    /// Site `site_id`.
    pub fn site_address(&self, site_id: &SiteId) -> Result<DerivedAddress, DerivationError> {
        derive(&[SITE_SEED, site_id.as_bytes()], &self.registry)
    }

    /// Inspector record of `owner` at `site_id`.
    pub fn inspector_address(
        &self,
        site_id: &SiteId,
        owner: &Address,
    ) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[INSPECTOR_SEED, site_id.as_bytes(), owner.as_ref()],
            &self.registry,
        )
    }

    /// Device `device_id` at `site_id`.
    pub fn device_address(
        &self,
        site_id: &SiteId,
        device_id: &DeviceId,
    ) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[DEVICE_SEED, site_id.as_bytes(), device_id.as_bytes()],
            &self.registry,
        )
    }

    /// Certificate `safety_check_id` of a device.
    pub fn safety_check_address(
        &self,
        site_id: &SiteId,
        device_id: &DeviceId,
        safety_check_id: &SafetyCheckId,
    ) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[
                SAFETY_CHECK_SEED,
                site_id.as_bytes(),
                device_id.as_bytes(),
                safety_check_id.as_bytes(),
            ],
            &self.registry,
        )
    }

    /// Proof mint of the certificate at `safety_check`.
    pub fn proof_mint_address(
        &self,
        safety_check: &Address,
    ) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[SAFETY_CHECK_MINT_SEED, safety_check.as_ref()],
            &self.registry,
        )
    }

    /// Vault holding `mint` on behalf of `owner`.
    pub fn vault_address(
        &self,
        owner: &Address,
        mint: &Address,
    ) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[owner.as_ref(), self.token.as_ref(), mint.as_ref()],
            &self.associated_token,
        )
    }

    /// Token metadata of `mint`.
    pub fn metadata_address(&self, mint: &Address) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[METADATA_SEED, self.metadata.as_ref(), mint.as_ref()],
            &self.metadata,
        )
    }

    /// Master edition of `mint`.
    pub fn master_edition_address(
        &self,
        mint: &Address,
    ) -> Result<DerivedAddress, DerivationError> {
        derive(
            &[
                METADATA_SEED,
                self.metadata.as_ref(),
                mint.as_ref(),
                EDITION_SEED,
            ],
            &self.metadata,
        )
    }
}
