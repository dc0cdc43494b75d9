//! # In-Memory Ledger
//!
//! Thread-safe, cloneable ledger backed by a `BTreeMap` behind a
//! `parking_lot::RwLock`. Clones share the same state, so a handle can be
//! given to every thread that submits operations.
//!
//! `parking_lot::RwLock` is non-poisonable: a panicking writer does not
//! permanently corrupt the ledger. A commit validates every precondition
//! and applies every write under a single write lock, which is what makes
//! it all-or-nothing.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use scm_core::Address;
use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::error::LedgerError;
use crate::transaction::{CommitReceipt, Transaction, Write};
use crate::Ledger;

/// Serializable image of a ledger, used to persist it between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot<R> {
    /// Slot of the last applied commit.
    pub slot: u64,
    /// Every initialized account, keyed by address.
    pub accounts: BTreeMap<Address, Account<R>>,
}

impl<R> Default for LedgerSnapshot<R> {
    fn default() -> Self {
        Self {
            slot: 0,
            accounts: BTreeMap::new(),
        }
    }
}

/// A ledger held entirely in process memory.
#[derive(Debug)]
pub struct InMemoryLedger<R> {
    state: Arc<RwLock<LedgerSnapshot<R>>>,
}

impl<R> Clone for InMemoryLedger<R> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<R> Default for InMemoryLedger<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> InMemoryLedger<R> {
    /// Create an empty ledger at slot 0.
    pub fn new() -> Self {
        Self::from_snapshot(LedgerSnapshot::default())
    }

    /// Restore a ledger from a snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot<R>) -> Self {
        Self {
            state: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Slot of the last applied commit.
    pub fn slot(&self) -> u64 {
        self.state.read().slot
    }

    /// Number of initialized accounts.
    pub fn len(&self) -> usize {
        self.state.read().accounts.len()
    }

    /// Whether no account has been initialized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<R: Clone> InMemoryLedger<R> {
    /// Copy out the full ledger state.
    pub fn snapshot(&self) -> LedgerSnapshot<R> {
        self.state.read().clone()
    }
}

fn check_write<R>(
    accounts: &BTreeMap<Address, Account<R>>,
    write: &Write<R>,
) -> Result<(), LedgerError> {
    match write {
        Write::Create { address, .. } => {
            if accounts.contains_key(address) {
                return Err(LedgerError::AlreadyInitialized(*address));
            }
        }
        Write::Replace {
            address,
            expected_version,
            ..
        } => {
            let current = accounts
                .get(address)
                .ok_or(LedgerError::NotFound(*address))?;
            if current.version != *expected_version {
                return Err(LedgerError::VersionConflict {
                    address: *address,
                    expected: *expected_version,
                    actual: current.version,
                });
            }
        }
    }
    Ok(())
}

impl<R: Clone + Send + Sync> Ledger<R> for InMemoryLedger<R> {
    fn get(&self, address: &Address) -> Option<Account<R>> {
        self.state.read().accounts.get(address).cloned()
    }

    fn commit(&self, tx: Transaction<R>) -> Result<CommitReceipt, LedgerError> {
        tx.validate_shape()?;

        let mut state = self.state.write();
        for write in tx.writes() {
            if let Err(e) = check_write(&state.accounts, write) {
                tracing::debug!(error = %e, writes = tx.len(), "ledger commit rejected");
                return Err(e);
            }
        }

        // Every precondition holds; nothing below can fail.
        state.slot += 1;
        let slot = state.slot;
        let mut addresses = Vec::with_capacity(tx.len());
        for write in tx.into_writes() {
            match write {
                Write::Create {
                    address,
                    owner,
                    record,
                } => {
                    state.accounts.insert(
                        address,
                        Account {
                            owner,
                            version: 0,
                            slot,
                            record,
                        },
                    );
                    addresses.push(address);
                }
                Write::Replace {
                    address, record, ..
                } => {
                    if let Some(account) = state.accounts.get_mut(&address) {
                        account.version += 1;
                        account.slot = slot;
                        account.record = record;
                    }
                    addresses.push(address);
                }
            }
        }

        tracing::debug!(slot, writes = addresses.len(), "ledger commit applied");
        Ok(CommitReceipt { slot, addresses })
    }
}
