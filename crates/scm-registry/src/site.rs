//! # Site Registry

use scm_core::{Address, SiteId};

use crate::context::{Loaded, ProgramContext};
use crate::error::RegistryError;
use crate::records::{RecordKind, RecordType, Site};

/// Creates and reads [`Site`] records.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    ctx: ProgramContext,
}

impl SiteRegistry {
    /// Site registry over `ctx`.
    pub fn new(ctx: ProgramContext) -> Self {
        Self { ctx }
    }

    /// Register a site. Anyone may create a site and becomes its authority.
    ///
    /// # Errors
    ///
    /// [`RegistryError::AlreadyExists`] if the site address is initialized.
    pub fn create(&self, site_id: SiteId, authority: Address) -> Result<Site, RegistryError> {
        let derived = self.ctx.programs.site_address(&site_id)?;
        tracing::debug!(site_id = %site_id, address = %derived.address, bump = derived.bump, "derived site address");

        let site = Site {
            site_id,
            authority,
            bump: derived.bump,
        };
        self.ctx.ledger.put_if_absent(
            derived.address,
            RecordKind::Site.owner(&self.ctx.programs),
            site.clone().into_record(),
        )?;

        tracing::info!(site_id = %site.site_id, address = %derived.address, authority = %authority, "site created");
        Ok(site)
    }

    /// Fetch a site, if it exists.
    pub fn get(&self, site_id: &SiteId) -> Result<Option<Loaded<Site>>, RegistryError> {
        let derived = self.ctx.programs.site_address(site_id)?;
        self.ctx.load(&derived.address)
    }

    /// Fetch a site or fail with [`RegistryError::SiteNotFound`].
    pub fn require(&self, site_id: &SiteId) -> Result<Loaded<Site>, RegistryError> {
        self.get(site_id)?.ok_or_else(|| RegistryError::SiteNotFound {
            site_id: site_id.clone(),
        })
    }
}
