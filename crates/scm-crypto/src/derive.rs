//! # Deterministic Address Derivation
//!
//! Computes the storage address of every record in the registry from an
//! ordered list of byte-string seeds and a program namespace.
//!
//! ## Algorithm
//!
//! ```text
//! candidate = SHA-256(seed_1 ‖ … ‖ seed_n ‖ [bump] ‖ namespace ‖ "ProgramDerivedAddress")
//! ```
//!
//! [`find_address()`] tries `bump = 255, 254, …, 0` and returns the first
//! candidate that does **not** decompress to a valid Ed25519 point. An
//! off-curve address has no corresponding private key, so only the program
//! owning the namespace can ever write to it.
//!
//! ## Security Invariant
//!
//! Derivation is total and pure: the same seeds and namespace always yield
//! the same `(address, bump)`, and any caller holding the seeds can
//! recompute it. The stored bump can be re-verified cheaply with
//! [`create_address()`].

use ed25519_dalek::VerifyingKey;
use scm_core::Address;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Maximum number of seeds, including the bump, in one derivation.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed in bytes.
pub const MAX_SEED_LEN: usize = 32;

/// Domain separator appended to every derivation preimage.
const DERIVED_ADDRESS_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Errors raised while deriving an address.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// A seed is longer than [`MAX_SEED_LEN`] bytes.
    #[error("seed {index} is {len} bytes; the maximum is {max}", max = MAX_SEED_LEN)]
    SeedTooLong {
        /// Position of the seed in the seed list.
        index: usize,
        /// Actual length of the seed.
        len: usize,
    },

    /// The seed list is longer than [`MAX_SEEDS`] (counting the bump).
    #[error("{count} seeds supplied; the maximum is {max}")]
    TooManySeeds {
        /// Number of seeds supplied.
        count: usize,
        /// Limit that applied.
        max: usize,
    },

    /// The candidate address lies on the Ed25519 curve.
    #[error("derived address lies on the ed25519 curve")]
    OnCurve,

    /// Every bump produced an on-curve candidate.
    #[error("no bump in 0..=255 yields an off-curve address")]
    NoViableBump,
}

fn check_seeds(seeds: &[&[u8]], max: usize) -> Result<(), DerivationError> {
    if seeds.len() > max {
        return Err(DerivationError::TooManySeeds {
            count: seeds.len(),
            max,
        });
    }
    if let Some((index, seed)) = seeds
        .iter()
        .enumerate()
        .find(|(_, seed)| seed.len() > MAX_SEED_LEN)
    {
        return Err(DerivationError::SeedTooLong {
            index,
            len: seed.len(),
        });
    }
    Ok(())
}

fn hash_candidate(seeds: &[&[u8]], bump: Option<u8>, namespace: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    if let Some(bump) = bump {
        hasher.update([bump]);
    }
    hasher.update(namespace.as_bytes());
    hasher.update(DERIVED_ADDRESS_MARKER);
    let mut out = [0u8; 32];
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Whether 32 bytes decode to a valid compressed Ed25519 point.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    VerifyingKey::from_bytes(bytes).is_ok()
}

/// Compute the address for a complete seed list (bump already appended).
///
/// # Errors
///
/// Fails with [`DerivationError::OnCurve`] if the result could be a public
/// key, or with a seed-limit error if the seeds are too long or too many.
pub fn create_address(seeds: &[&[u8]], namespace: &Address) -> Result<Address, DerivationError> {
    check_seeds(seeds, MAX_SEEDS)?;
    let candidate = hash_candidate(seeds, None, namespace);
    if is_on_curve(&candidate) {
        return Err(DerivationError::OnCurve);
    }
    Ok(Address::new(candidate))
}

/// Find the canonical `(address, bump)` for a seed list.
///
/// The bump is the highest value in `0..=255` whose candidate is off-curve.
/// Roughly half of all candidates are off-curve, so the loop almost always
/// ends within a few iterations.
///
/// # Errors
///
/// - [`DerivationError::SeedTooLong`] if any seed exceeds [`MAX_SEED_LEN`].
/// - [`DerivationError::TooManySeeds`] if more than `MAX_SEEDS - 1` seeds
///   are supplied (the bump takes the last slot).
/// - [`DerivationError::NoViableBump`] if all 256 candidates are on-curve.
pub fn find_address(seeds: &[&[u8]], namespace: &Address) -> Result<(Address, u8), DerivationError> {
    check_seeds(seeds, MAX_SEEDS - 1)?;
    for bump in (0..=u8::MAX).rev() {
        let candidate = hash_candidate(seeds, Some(bump), namespace);
        if !is_on_curve(&candidate) {
            return Ok((Address::new(candidate), bump));
        }
    }
    Err(DerivationError::NoViableBump)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn namespace() -> Address {
        Address::from_label("test-program")
    }

    #[test]
    fn test_find_is_deterministic() {
        let seeds: &[&[u8]] = &[b"site", b"S1"];
        let a = find_address(seeds, &namespace()).unwrap();
        let b = find_address(seeds, &namespace()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_found_address_is_off_curve() {
        let (addr, _) = find_address(&[b"device", b"S1", b"D1"], &namespace()).unwrap();
        assert!(!is_on_curve(addr.as_bytes()));
    }

    #[test]
    fn test_stored_bump_reverifies() {
        let seeds: &[&[u8]] = &[b"site", b"S1"];
        let (addr, bump) = find_address(seeds, &namespace()).unwrap();
        let bump_seed = [bump];
        let recomputed = create_address(&[b"site", b"S1", &bump_seed], &namespace()).unwrap();
        assert_eq!(recomputed, addr);
    }

    #[test]
    fn test_seed_order_matters() {
        let (a, _) = find_address(&[b"device", b"S1", b"D1"], &namespace()).unwrap();
        let (b, _) = find_address(&[b"device", b"D1", b"S1"], &namespace()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_namespace_matters() {
        let seeds: &[&[u8]] = &[b"site", b"S1"];
        let (a, _) = find_address(seeds, &namespace()).unwrap();
        let (b, _) = find_address(seeds, &Address::from_label("other-program")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_seed_too_long() {
        let long = [7u8; 33];
        let err = find_address(&[b"site", &long], &namespace()).unwrap_err();
        assert_eq!(err, DerivationError::SeedTooLong { index: 1, len: 33 });
    }

    #[test]
    fn test_seed_at_limit_accepted() {
        let exact = [7u8; MAX_SEED_LEN];
        assert!(find_address(&[b"site", &exact], &namespace()).is_ok());
    }

    #[test]
    fn test_too_many_seeds() {
        let x: &[u8] = b"x";
        let seeds = vec![x; MAX_SEEDS];
        assert_eq!(
            find_address(&seeds, &namespace()).unwrap_err(),
            DerivationError::TooManySeeds {
                count: MAX_SEEDS,
                max: MAX_SEEDS - 1,
            }
        );
        // With the bump included, create_address allows the full sixteen.
        let (_, bump) = find_address(&seeds[..MAX_SEEDS - 1], &namespace()).unwrap();
        let bump_seed = [bump];
        let mut full = seeds[..MAX_SEEDS - 1].to_vec();
        full.push(&bump_seed);
        assert!(create_address(&full, &namespace()).is_ok());
    }

    #[test]
    fn test_public_key_is_on_curve() {
        let kp = crate::IdentityKeyPair::from_seed(&[9u8; 32]);
        assert!(is_on_curve(kp.address().as_bytes()));
    }

    proptest! {
        #[test]
        fn derivation_is_deterministic(
            a in proptest::collection::vec(any::<u8>(), 0..=32),
            b in proptest::collection::vec(any::<u8>(), 0..=32),
        ) {
            let seeds: [&[u8]; 2] = [&a, &b];
            let first = find_address(&seeds, &namespace()).unwrap();
            let second = find_address(&seeds, &namespace()).unwrap();
            prop_assert_eq!(first, second);
            prop_assert!(!is_on_curve(first.0.as_bytes()));
        }
    }
}
