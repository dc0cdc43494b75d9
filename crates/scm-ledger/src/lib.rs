#![deny(missing_docs)]

//! # scm-ledger: Shared Ledger Storage
//!
//! The registry never holds global mutable state. Everything it knows lives
//! in accounts on a [`Ledger`], injected as a trait object, so tests can
//! drive the same code against an in-memory ledger and simulate races.
//!
//! ## Model
//!
//! - An [`Account`] sits at an [`Address`] and carries its owning program,
//!   a `version` counter, and a record of type `R`.
//! - A [`Transaction`] is an ordered batch of writes. Each write carries its
//!   own precondition: `Create` requires the address to be uninitialized,
//!   `Replace` requires the account to be at an expected version.
//! - [`Ledger::commit()`] checks every precondition against current state
//!   and then applies every write, or applies nothing. This is the only
//!   concurrency control in the system.

pub mod account;
pub mod error;
pub mod memory;
pub mod transaction;

pub use account::Account;
pub use error::LedgerError;
pub use memory::{InMemoryLedger, LedgerSnapshot};
pub use transaction::{CommitReceipt, Transaction, Write};

use scm_core::Address;

/// Storage interface for the shared ledger.
///
/// Implementations must make [`commit()`](Ledger::commit) atomic with
/// respect to every other call on the same ledger.
pub trait Ledger<R>: Send + Sync {
    /// Fetch the account at `address`, if it is initialized.
    fn get(&self, address: &Address) -> Option<Account<R>>;

    /// Apply every write of `tx`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns the first precondition that fails. On error no write of the
    /// transaction is observable.
    fn commit(&self, tx: Transaction<R>) -> Result<CommitReceipt, LedgerError>;

    /// Whether an account is initialized at `address`.
    fn contains(&self, address: &Address) -> bool {
        self.get(address).is_some()
    }

    /// Initialize a single account, failing if it already exists.
    fn put_if_absent(
        &self,
        address: Address,
        owner: Address,
        record: R,
    ) -> Result<CommitReceipt, LedgerError> {
        self.commit(Transaction::new().create(address, owner, record))
    }

    /// Overwrite a single account if it is still at `expected_version`.
    fn compare_and_swap(
        &self,
        address: Address,
        expected_version: u64,
        record: R,
    ) -> Result<CommitReceipt, LedgerError> {
        self.commit(Transaction::new().replace(address, expected_version, record))
    }
}
