//! # Program Context
//!
//! The handles every registry component shares: the ledger, the clock, and
//! the program ids. Cloning a context is cheap and clones share the same
//! ledger.

use std::sync::Arc;

use scm_core::{Address, Clock, SystemClock};
use scm_ledger::{InMemoryLedger, Ledger};
use serde::Serialize;

use crate::config::ProgramIds;
use crate::error::RegistryError;
use crate::records::{Record, RecordType};

/// Shared handles injected into every registry component.
#[derive(Clone)]
pub struct ProgramContext {
    /// Where every record is read and written.
    pub ledger: Arc<dyn Ledger<Record>>,
    /// Source of `created_at` for certificates.
    pub clock: Arc<dyn Clock>,
    /// Namespaces and record owners.
    pub programs: ProgramIds,
}

impl std::fmt::Debug for ProgramContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramContext")
            .field("programs", &self.programs)
            .field("now", &self.clock.now())
            .finish_non_exhaustive()
    }
}

/// A typed record read from the ledger, with the version needed to
/// overwrite it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loaded<T> {
    /// Address the record was read from.
    pub address: Address,
    /// Account version at read time.
    pub version: u64,
    /// The decoded record.
    pub record: T,
}

impl ProgramContext {
    /// Bundle the shared handles.
    pub fn new(
        ledger: Arc<dyn Ledger<Record>>,
        clock: Arc<dyn Clock>,
        programs: ProgramIds,
    ) -> Self {
        Self {
            ledger,
            clock,
            programs,
        }
    }

    /// A fresh in-memory ledger with the system clock and default programs.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryLedger::<Record>::new()),
            Arc::new(SystemClock),
            ProgramIds::default(),
        )
    }

    /// Read a typed record.
    ///
    /// Returns `Ok(None)` for an uninitialized address and
    /// [`RegistryError::CorruptAccount`] when the account holds a different
    /// kind of record or is owned by the wrong program.
    pub fn load<T: RecordType>(&self, address: &Address) -> Result<Option<Loaded<T>>, RegistryError> {
        let Some(account) = self.ledger.get(address) else {
            return Ok(None);
        };
        let found = account.record.kind();
        if account.owner != T::KIND.owner(&self.programs) {
            return Err(RegistryError::CorruptAccount {
                address: *address,
                expected: T::KIND,
                found: format!("{found} owned by {}", account.owner),
            });
        }
        match T::from_record(account.record) {
            Some(record) => Ok(Some(Loaded {
                address: *address,
                version: account.version,
                record,
            })),
            None => Err(RegistryError::CorruptAccount {
                address: *address,
                expected: T::KIND,
                found: found.to_string(),
            }),
        }
    }
}
