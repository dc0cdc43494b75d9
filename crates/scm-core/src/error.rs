//! # Error Types
//!
//! Leaf error types for the core primitives. All errors use `thiserror`
//! for derive-based `Display` and `Error` implementations. Higher crates
//! fold these into their own error enums.

use thiserror::Error;

/// Error parsing an [`Address`](crate::Address) from its text form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The hex string does not encode exactly 32 bytes.
    #[error("address hex must be 64 chars, got {0}")]
    InvalidLength(usize),

    /// The string contains a non-hex character.
    #[error("invalid hex at position {position}: {character:?}")]
    InvalidHex {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        character: char,
    },
}

/// Error constructing a domain identifier.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Identifiers must contain at least one byte.
    #[error("{kind} must not be empty")]
    Empty {
        /// Identifier kind (e.g. `"site id"`).
        kind: &'static str,
    },

    /// Identifiers must not contain control characters.
    #[error("{kind} contains a control character: {value:?}")]
    ControlCharacter {
        /// Identifier kind.
        kind: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Error computing a certificate expiry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExpiryError {
    /// Certificate durations must be strictly positive.
    #[error("duration must be a positive number of days, got {0}")]
    InvalidDuration(i64),

    /// `created_at + duration_in_days * 86400` does not fit in an `i64`.
    #[error("expiry overflows: created_at={created_at}, duration_in_days={duration_in_days}")]
    DurationOverflow {
        /// Creation time in Unix seconds.
        created_at: i64,
        /// Requested duration in days.
        duration_in_days: i64,
    },
}
