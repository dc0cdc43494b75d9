//! # Authority Policy
//!
//! Who may do what. Every check lives here so the registries share one
//! reading of the rules.

use scm_core::Address;

use crate::error::RegistryError;
use crate::records::{Inspector, Site};

/// Longest token name, in bytes.
pub const MAX_NAME_LEN: usize = 32;
/// Longest token symbol, in bytes.
pub const MAX_SYMBOL_LEN: usize = 10;
/// Longest metadata uri, in bytes.
pub const MAX_URI_LEN: usize = 200;

/// Only the site authority registers inspectors and devices.
pub fn require_site_authority(
    site: &Site,
    requester: &Address,
    action: &'static str,
) -> Result<(), RegistryError> {
    if site.authority != *requester {
        tracing::warn!(
            site_id = %site.site_id,
            requester = %requester,
            action,
            "rejected: requester is not the site authority"
        );
        return Err(RegistryError::Unauthorized {
            requester: *requester,
            action,
        });
    }
    Ok(())
}

/// A certificate may be issued by the inspector it names or by the
/// authority of the site.
pub fn require_certificate_issuer(
    site: &Site,
    inspector: &Inspector,
    requester: &Address,
) -> Result<(), RegistryError> {
    if inspector.owner == *requester || site.authority == *requester {
        return Ok(());
    }
    tracing::warn!(
        site_id = %site.site_id,
        inspector = %inspector.owner,
        requester = %requester,
        "rejected: requester may not issue certificates for this inspector"
    );
    Err(RegistryError::Unauthorized {
        requester: *requester,
        action: "issue a safety check",
    })
}

/// The inspector must be registered under the site being certified.
pub fn require_inspector_site(site: &Site, inspector: &Inspector) -> Result<(), RegistryError> {
    if inspector.site_id != site.site_id {
        tracing::warn!(
            site_id = %site.site_id,
            inspector_site = %inspector.site_id,
            "rejected: inspector is registered under another site"
        );
        return Err(RegistryError::InspectorSiteMismatch {
            expected: site.site_id.clone(),
            actual: inspector.site_id.clone(),
        });
    }
    Ok(())
}

/// Byte-length limits of the token descriptor.
pub fn validate_metadata(name: &str, symbol: &str, uri: &str) -> Result<(), RegistryError> {
    for (field, value, max) in [
        ("name", name, MAX_NAME_LEN),
        ("symbol", symbol, MAX_SYMBOL_LEN),
        ("uri", uri, MAX_URI_LEN),
    ] {
        if value.len() > max {
            return Err(RegistryError::InvalidMetadata {
                field,
                len: value.len(),
                max,
            });
        }
    }
    Ok(())
}
