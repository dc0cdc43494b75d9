#![deny(missing_docs)]

//! # scm-core: Foundational Types for the Safety Check Manager
//!
//! This crate is the leaf of the workspace. It defines the primitives every
//! other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`Address` is the only storage key.** Every record on the ledger lives
//!    at a 32-byte address. Identities (site authorities, inspector owners)
//!    and program namespaces share the same type.
//!
//! 2. **Newtype wrappers for identifiers.** `SiteId`, `DeviceId`, and
//!    `SafetyCheckId` cannot be confused with one another. No bare strings
//!    for identifiers.
//!
//! 3. **Integer seconds for time.** Ledger time is `UnixTimestamp` (`i64`
//!    seconds since the Unix epoch). The `Clock` trait is the only way the
//!    registry learns the current time.
//!
//! 4. **Checked expiry arithmetic.** [`expires_at()`] never wraps; overflow is
//!    a hard error.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `scm-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod address;
pub mod error;
pub mod identity;
pub mod temporal;

pub use address::Address;
pub use error::{AddressError, ExpiryError, IdentifierError};
pub use identity::{DeviceId, SafetyCheckId, SiteId};
pub use temporal::{
    expires_at, to_iso8601, Clock, FixedClock, SystemClock, UnixTimestamp, SECONDS_PER_DAY,
};
