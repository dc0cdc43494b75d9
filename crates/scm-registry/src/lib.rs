#![deny(missing_docs)]

//! # scm-registry: Safety Inspection Registry
//!
//! Records organizational sites, their inspectors and devices, and
//! time-bound safety check certificates on a shared ledger. Each
//! certificate is backed by a one-of-one proof-token held in a vault owned
//! by the inspected device.
//!
//! ## Lifecycle
//!
//! ```text
//! create_site ─► create_inspector ─┐
//!             └► create_device ────┴─► create_safety_check (repeatable)
//! ```
//!
//! Sites and inspectors never change once written. A device is rewritten
//! by every certificate issued for it, always in the same commit that
//! creates the certificate.
//!
//! ## Addresses
//!
//! Every record lives at an address derived from its identifiers (see
//! [`seeds`]). Nothing is looked up by scanning; two clients holding the
//! same identifiers compute the same addresses.
//!
//! ## Concurrency
//!
//! The ledger is the only synchronization point. Duplicate creation is
//! caught by put-if-absent, and device updates by compare-and-swap. There
//! are no locks or retries in this crate.

pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod inspector;
pub mod issuer;
pub mod policy;
pub mod program;
pub mod records;
pub mod seeds;
pub mod site;

pub use config::{ConfigError, ProgramIds};
pub use context::{Loaded, ProgramContext};
pub use device::DeviceRegistry;
pub use error::RegistryError;
pub use inspector::InspectorRegistry;
pub use issuer::{CertificateIssuer, IssuedSafetyCheck, SafetyCheckRequest};
pub use program::{DeviceStatus, SafetyCheckProgram};
pub use records::{
    Device, Inspector, MasterEdition, ProofMint, Record, RecordKind, RecordType, SafetyCheck, Site,
    TokenMetadata, TokenVault,
};
pub use seeds::DerivedAddress;
pub use site::SiteRegistry;
