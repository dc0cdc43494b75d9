//! # Ledger Errors

use scm_core::Address;
use thiserror::Error;

/// A transaction precondition that did not hold.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// `Create` targeted an address that is already initialized.
    #[error("account {0} is already initialized")]
    AlreadyInitialized(Address),

    /// `Replace` targeted an address that is not initialized.
    #[error("account {0} not found")]
    NotFound(Address),

    /// `Replace` expected a different version than the one stored.
    #[error("account {address} is at version {actual}, expected {expected}")]
    VersionConflict {
        /// The contended account.
        address: Address,
        /// Version the writer read.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// The same address appears in more than one write of a transaction.
    #[error("account {0} is written more than once in one transaction")]
    DuplicateWrite(Address),

    /// A transaction with no writes was submitted.
    #[error("transaction contains no writes")]
    EmptyTransaction,
}
