//! # Accounts

use scm_core::Address;
use serde::{Deserialize, Serialize};

/// A record stored on the ledger together with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account<R> {
    /// Program that owns (and alone may write) this account.
    pub owner: Address,
    /// Starts at 0 on creation; incremented by every replace.
    pub version: u64,
    /// Slot of the commit that last wrote this account.
    pub slot: u64,
    /// The stored record.
    pub record: R,
}
