//! # Inspector Registry
//!
//! Inspectors are scoped to a site. The owner of an inspector record need
//! not be the site authority, but only the authority can register one.

use scm_core::{Address, SiteId};

use crate::context::{Loaded, ProgramContext};
use crate::error::RegistryError;
use crate::policy;
use crate::records::{Inspector, RecordKind, RecordType};
use crate::site::SiteRegistry;

/// Creates and reads [`Inspector`] records.
#[derive(Debug, Clone)]
pub struct InspectorRegistry {
    ctx: ProgramContext,
    sites: SiteRegistry,
}

impl InspectorRegistry {
    /// Inspector registry over `ctx`.
    pub fn new(ctx: ProgramContext) -> Self {
        let sites = SiteRegistry::new(ctx.clone());
        Self { ctx, sites }
    }

    /// Register `owner` as an inspector of `site_id`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::SiteNotFound`]
    /// - [`RegistryError::Unauthorized`] unless `requester` is the site authority
    /// - [`RegistryError::AlreadyExists`] for a second registration of the same owner
    pub fn create(
        &self,
        site_id: SiteId,
        owner: Address,
        requester: &Address,
    ) -> Result<Inspector, RegistryError> {
        let site = self.sites.require(&site_id)?;
        policy::require_site_authority(&site.record, requester, "register an inspector")?;

        let derived = self.ctx.programs.inspector_address(&site_id, &owner)?;
        tracing::debug!(site_id = %site_id, address = %derived.address, bump = derived.bump, "derived inspector address");

        let inspector = Inspector {
            site_id,
            owner,
            bump: derived.bump,
        };
        self.ctx.ledger.put_if_absent(
            derived.address,
            RecordKind::Inspector.owner(&self.ctx.programs),
            inspector.clone().into_record(),
        )?;

        tracing::info!(site_id = %inspector.site_id, owner = %owner, address = %derived.address, "inspector registered");
        Ok(inspector)
    }

    /// Read the inspector record of `owner` at `site_id`.
    pub fn get(
        &self,
        site_id: &SiteId,
        owner: &Address,
    ) -> Result<Option<Loaded<Inspector>>, RegistryError> {
        let derived = self.ctx.programs.inspector_address(site_id, owner)?;
        self.ctx.load(&derived.address)
    }

    /// Like [`get`](Self::get), with a missing record as
    /// [`RegistryError::InspectorNotFound`].
    pub fn require(&self, site_id: &SiteId, owner: &Address) -> Result<Loaded<Inspector>, RegistryError> {
        self.get(site_id, owner)?
            .ok_or_else(|| RegistryError::InspectorNotFound {
                site_id: site_id.clone(),
                owner: *owner,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORITY: Address = Address::new([1; 32]);
    const OWNER: Address = Address::new([2; 32]);

    fn setup() -> (SiteRegistry, InspectorRegistry) {
        let ctx = ProgramContext::in_memory();
        let sites = SiteRegistry::new(ctx.clone());
        sites.create(SiteId::new("S1").unwrap(), AUTHORITY).unwrap();
        (sites, InspectorRegistry::new(ctx))
    }

    #[test]
    fn test_authority_registers_inspector() {
        let (_, inspectors) = setup();
        let inspector = inspectors
            .create(SiteId::new("S1").unwrap(), OWNER, &AUTHORITY)
            .unwrap();
        assert_eq!(inspector.owner, OWNER);
        assert!(inspectors
            .get(&SiteId::new("S1").unwrap(), &OWNER)
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_non_authority_rejected() {
        let (_, inspectors) = setup();
        let err = inspectors
            .create(SiteId::new("S1").unwrap(), OWNER, &OWNER)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));
        assert!(inspectors
            .get(&SiteId::new("S1").unwrap(), &OWNER)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_unknown_site() {
        let (_, inspectors) = setup();
        assert!(matches!(
            inspectors.create(SiteId::new("S9").unwrap(), OWNER, &AUTHORITY),
            Err(RegistryError::SiteNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_inspector() {
        let (_, inspectors) = setup();
        inspectors
            .create(SiteId::new("S1").unwrap(), OWNER, &AUTHORITY)
            .unwrap();
        assert!(matches!(
            inspectors.create(SiteId::new("S1").unwrap(), OWNER, &AUTHORITY),
            Err(RegistryError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_require_missing() {
        let (_, inspectors) = setup();
        assert_eq!(
            inspectors.require(&SiteId::new("S1").unwrap(), &OWNER),
            Err(RegistryError::InspectorNotFound {
                site_id: SiteId::new("S1").unwrap(),
                owner: OWNER,
            })
        );
    }
}
