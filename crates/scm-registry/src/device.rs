//! # Device Registry

use scm_core::{Address, DeviceId, SiteId};

use crate::context::{Loaded, ProgramContext};
use crate::error::RegistryError;
use crate::policy;
use crate::records::{Device, RecordKind, RecordType};
use crate::site::SiteRegistry;

/// Creates and reads [`Device`] records. Devices are only ever mutated by
/// certificate issuance.
#[derive(Debug, Clone)]
pub struct DeviceRegistry {
    ctx: ProgramContext,
    sites: SiteRegistry,
}

impl DeviceRegistry {
    /// Device registry over `ctx`.
    pub fn new(ctx: ProgramContext) -> Self {
        let sites = SiteRegistry::new(ctx.clone());
        Self { ctx, sites }
    }

    /// Register a device under a site. The device starts uninspected.
    ///
    /// # Errors
    ///
    /// Same as inspector registration: `SiteNotFound`, `Unauthorized`,
    /// `AlreadyExists`.
    pub fn create(
        &self,
        site_id: SiteId,
        device_id: DeviceId,
        requester: &Address,
    ) -> Result<Device, RegistryError> {
        let site = self.sites.require(&site_id)?;
        policy::require_site_authority(&site.record, requester, "register a device")?;

        let derived = self.ctx.programs.device_address(&site_id, &device_id)?;
        tracing::debug!(device_id = %device_id, address = %derived.address, bump = derived.bump, "derived device address");

        let device = Device {
            site_id,
            device_id,
            last_safety_check: None,
            expires_at: None,
            bump: derived.bump,
        };
        self.ctx.ledger.put_if_absent(
            derived.address,
            RecordKind::Device.owner(&self.ctx.programs),
            device.clone().into_record(),
        )?;

        tracing::info!(site_id = %device.site_id, device_id = %device.device_id, address = %derived.address, "device registered");
        Ok(device)
    }

    /// Read a device. `Ok(None)` if it was never registered.
    pub fn get(
        &self,
        site_id: &SiteId,
        device_id: &DeviceId,
    ) -> Result<Option<Loaded<Device>>, RegistryError> {
        let derived = self.ctx.programs.device_address(site_id, device_id)?;
        self.ctx.load(&derived.address)
    }

    /// Like [`get`](Self::get), with a missing device as
    /// [`RegistryError::DeviceNotFound`].
    pub fn require(&self, site_id: &SiteId, device_id: &DeviceId) -> Result<Loaded<Device>, RegistryError> {
        self.get(site_id, device_id)?
            .ok_or_else(|| RegistryError::DeviceNotFound {
                site_id: site_id.clone(),
                device_id: device_id.clone(),
            })
    }
}
