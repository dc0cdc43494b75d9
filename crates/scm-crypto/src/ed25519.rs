//! # Ed25519 Identities
//!
//! Caller identities (site authorities, inspector owners) are Ed25519
//! verifying keys. Their 32 bytes are used directly as a ledger
//! [`Address`], which is why derived record addresses must lie off-curve:
//! the two address spaces can never collide.
//!
//! ## Security Invariant
//!
//! - Private keys are never serialized or logged. `IdentityKeyPair` does
//!   not implement `Serialize`, and its `Debug` output is redacted.
//! - The seed is only exported through the explicitly named
//!   [`IdentityKeyPair::seed_hex()`], for local key files.

use ed25519_dalek::SigningKey;
use scm_core::{Address, AddressError};

/// An Ed25519 key pair whose public half is a ledger identity.
pub struct IdentityKeyPair {
    signing_key: SigningKey,
}

impl IdentityKeyPair {
    /// Generate a new random key pair from the OS RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        let signing_key = SigningKey::generate(&mut csprng);
        Self { signing_key }
    }

    /// Create a key pair from a raw 32-byte private key seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Parse a key pair from a 64-character hex seed.
    pub fn from_seed_hex(hex: &str) -> Result<Self, AddressError> {
        // Same width and alphabet as an address.
        let seed = Address::from_hex(hex)?;
        Ok(Self::from_seed(seed.as_bytes()))
    }

    /// The ledger identity of this key pair.
    pub fn address(&self) -> Address {
        Address::new(self.signing_key.verifying_key().to_bytes())
    }

    /// Export the private seed as hex.
    pub fn seed_hex(&self) -> String {
        Address::new(self.signing_key.to_bytes()).to_hex()
    }
}

impl std::fmt::Debug for IdentityKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IdentityKeyPair({})", self.address())
    }
}
