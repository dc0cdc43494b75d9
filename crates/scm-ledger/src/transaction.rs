//! # Transactions
//!
//! A unit of work against the ledger. Writes are collected with the
//! builder methods and handed to [`Ledger::commit()`](crate::Ledger::commit)
//! in one piece.

use std::collections::BTreeSet;

use scm_core::Address;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// One write inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write<R> {
    /// Initialize an account. Fails if the address is already in use.
    Create {
        /// Target address.
        address: Address,
        /// Owning program of the new account.
        owner: Address,
        /// Initial record.
        record: R,
    },
    /// Overwrite an account. Fails unless it is at `expected_version`.
    Replace {
        /// Target address.
        address: Address,
        /// Version the writer observed.
        expected_version: u64,
        /// New record.
        record: R,
    },
}

impl<R> Write<R> {
    /// The address this write touches.
    pub fn address(&self) -> &Address {
        match self {
            Self::Create { address, .. } | Self::Replace { address, .. } => address,
        }
    }
}

/// An ordered batch of writes applied all together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction<R> {
    writes: Vec<Write<R>>,
}

impl<R> Default for Transaction<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Transaction<R> {
    /// Start an empty transaction.
    pub fn new() -> Self {
        Self { writes: Vec::new() }
    }

    /// Add a `Create` write.
    pub fn create(mut self, address: Address, owner: Address, record: R) -> Self {
        self.writes.push(Write::Create {
            address,
            owner,
            record,
        });
        self
    }

    /// Add a `Replace` write.
    pub fn replace(mut self, address: Address, expected_version: u64, record: R) -> Self {
        self.writes.push(Write::Replace {
            address,
            expected_version,
            record,
        });
        self
    }

    /// The writes in submission order.
    pub fn writes(&self) -> &[Write<R>] {
        &self.writes
    }

    /// Number of writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether the transaction has no writes.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consume the transaction, yielding its writes.
    pub fn into_writes(self) -> Vec<Write<R>> {
        self.writes
    }

    /// Check the structural rules that do not depend on ledger state.
    pub fn validate_shape(&self) -> Result<(), LedgerError> {
        if self.writes.is_empty() {
            return Err(LedgerError::EmptyTransaction);
        }
        let mut seen = BTreeSet::new();
        for write in &self.writes {
            if !seen.insert(*write.address()) {
                return Err(LedgerError::DuplicateWrite(*write.address()));
            }
        }
        Ok(())
    }
}

/// Proof that a transaction was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Monotonic commit counter of the ledger.
    pub slot: u64,
    /// Addresses written, in submission order.
    pub addresses: Vec<Address>,
}
