#![deny(missing_docs)]

//! # scm-crypto: Cryptographic Primitives
//!
//! Provides the cryptographic building blocks for the Safety Check Manager:
//!
//! - **Address derivation**: maps ordered seeds plus a program namespace to
//!   a deterministic address that is guaranteed to lie off the Ed25519
//!   curve, so no private key can ever sign for it.
//! - **Ed25519 identities**: key pairs whose verifying key doubles as the
//!   caller's ledger [`Address`](scm_core::Address).
//!
//! ## Crate Policy
//!
//! - Depends only on `scm-core` internally.
//! - No mocking of cryptographic operations in tests: all tests use real
//!   SHA-256 and real curve decompression.

pub mod derive;
pub mod ed25519;

pub use derive::{
    create_address, find_address, is_on_curve, DerivationError, MAX_SEEDS, MAX_SEED_LEN,
};
pub use ed25519::IdentityKeyPair;
