//! # Registry Errors
//!
//! Every failure is detected before a commit is attempted, or reported by
//! the ledger as a rejected precondition. In both cases nothing was written.

use scm_core::{Address, DeviceId, ExpiryError, IdentifierError, SiteId};
use scm_crypto::DerivationError;
use scm_ledger::LedgerError;
use thiserror::Error;

use crate::records::RecordKind;

/// Errors returned by registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No site is registered under the id.
    #[error("{site_id} not found")]
    SiteNotFound {
        /// The missing site.
        site_id: SiteId,
    },

    /// The owner has no inspector record at the site.
    #[error("inspector {owner} not found at {site_id}")]
    InspectorNotFound {
        /// Site that was searched.
        site_id: SiteId,
        /// Inspector owner that was looked up.
        owner: Address,
    },

    /// No device is registered under the id at the site.
    #[error("{device_id} not found at {site_id}")]
    DeviceNotFound {
        /// Site that was searched.
        site_id: SiteId,
        /// The missing device.
        device_id: DeviceId,
    },

    /// The target address is already initialized.
    #[error("account {address} already exists")]
    AlreadyExists {
        /// The occupied address.
        address: Address,
    },

    /// The requester lacks the authority the operation needs.
    #[error("{requester} is not authorized to {action}")]
    Unauthorized {
        /// Who asked.
        requester: Address,
        /// What they asked to do.
        action: &'static str,
    },

    /// The inspector record belongs to a different site than the device.
    #[error("inspector belongs to {actual}, expected {expected}")]
    InspectorSiteMismatch {
        /// Site of the device.
        expected: SiteId,
        /// Site of the inspector.
        actual: SiteId,
    },

    /// `duration_in_days` was zero or negative.
    #[error("duration must be a positive number of days, got {0}")]
    InvalidDuration(i64),

    /// The expiry timestamp does not fit in an `i64`.
    #[error("expiry overflows: created_at={created_at}, duration_in_days={duration_in_days}")]
    DurationOverflow {
        /// Issuance time.
        created_at: i64,
        /// Requested duration.
        duration_in_days: i64,
    },

    /// A token metadata field is too long.
    #[error("{field} is {len} bytes, at most {max} allowed")]
    InvalidMetadata {
        /// `name`, `symbol` or `uri`.
        field: &'static str,
        /// Actual length.
        len: usize,
        /// Allowed length.
        max: usize,
    },

    /// An identifier failed validation.
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// Another writer updated the account between read and commit.
    #[error("account {address} was modified concurrently")]
    Conflict {
        /// The contended account.
        address: Address,
    },

    /// Seeds were too long or no bump produced an off-curve address.
    #[error("address derivation failed: {0}")]
    Derivation(#[from] DerivationError),

    /// Any other ledger rejection.
    #[error("ledger rejected the transaction: {0}")]
    Ledger(LedgerError),

    /// The account at a derived address holds something other than the
    /// expected record, or is owned by the wrong program.
    #[error("account {address} holds {found}, expected {expected}")]
    CorruptAccount {
        /// Address that was read.
        address: Address,
        /// Kind the caller asked for.
        expected: RecordKind,
        /// What is actually stored there.
        found: String,
    },
}

impl From<LedgerError> for RegistryError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AlreadyInitialized(address) => Self::AlreadyExists { address },
            LedgerError::VersionConflict { address, .. } | LedgerError::NotFound(address) => {
                Self::Conflict { address }
            }
            other => Self::Ledger(other),
        }
    }
}

impl From<ExpiryError> for RegistryError {
    fn from(err: ExpiryError) -> Self {
        match err {
            ExpiryError::InvalidDuration(days) => Self::InvalidDuration(days),
            ExpiryError::DurationOverflow {
                created_at,
                duration_in_days,
            } => Self::DurationOverflow {
                created_at,
                duration_in_days,
            },
        }
    }
}
