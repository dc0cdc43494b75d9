//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the caller-chosen identifiers of the registry.
//! These prevent accidental identifier confusion: you cannot pass a
//! `DeviceId` where a `SiteId` is expected, which matters because both end
//! up as raw seed bytes during address derivation.
//!
//! Identifiers are variable-length UTF-8 strings. Their upper length bound
//! is a property of address derivation (a seed is at most 32 bytes), so it
//! is enforced there rather than here.

use serde::{Deserialize, Serialize};

use crate::error::IdentifierError;

/// Identifier of an organizational site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(String);

/// Identifier of a device, unique within its site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

/// Identifier of a safety check, unique within its device.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SafetyCheckId(String);

fn validate(kind: &'static str, value: &str) -> Result<(), IdentifierError> {
    if value.is_empty() {
        return Err(IdentifierError::Empty { kind });
    }
    if value.chars().any(char::is_control) {
        return Err(IdentifierError::ControlCharacter {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

impl SiteId {
    /// Create a site identifier, rejecting empty or control-character input.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate("site id", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The seed bytes used for address derivation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl DeviceId {
    /// Create a device identifier, rejecting empty or control-character input.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate("device id", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The seed bytes used for address derivation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl SafetyCheckId {
    /// Create a safety check identifier, rejecting empty or control-character input.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
        let value = value.into();
        validate("safety check id", &value)?;
        Ok(Self(value))
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The seed bytes used for address derivation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for SiteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "site:{}", self.0)
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "device:{}", self.0)
    }
}

impl std::fmt::Display for SafetyCheckId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "safety_check:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert_eq!(SiteId::new("S1").unwrap().as_str(), "S1");
        assert_eq!(DeviceId::new("pump-7").unwrap().as_bytes(), b"pump-7");
        assert_eq!(SafetyCheckId::new("2026-10").unwrap().as_str(), "2026-10");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(
            SiteId::new(""),
            Err(IdentifierError::Empty { kind: "site id" })
        );
        assert!(DeviceId::new("").is_err());
        assert!(SafetyCheckId::new("").is_err());
    }

    #[test]
    fn test_control_character_rejected() {
        assert!(matches!(
            DeviceId::new("dev\n1"),
            Err(IdentifierError::ControlCharacter { kind: "device id", .. })
        ));
    }

    #[test]
    fn test_long_identifiers_are_not_rejected_here() {
        // The 32-byte seed limit belongs to address derivation.
        assert!(SiteId::new("x".repeat(64)).is_ok());
    }

    #[test]
    fn test_display_prefixes() {
        assert_eq!(SiteId::new("S1").unwrap().to_string(), "site:S1");
        assert_eq!(DeviceId::new("D1").unwrap().to_string(), "device:D1");
        assert_eq!(
            SafetyCheckId::new("C1").unwrap().to_string(),
            "safety_check:C1"
        );
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = SiteId::new("S1").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"S1\"");
    }
}
