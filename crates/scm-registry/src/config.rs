//! # Program Configuration
//!
//! The four program namespaces the registry derives addresses under.
//! Defaults are fixed, so two processes with no configuration agree on
//! every address. Override from a YAML file, from environment variables,
//! or by explicit construction for tests.

use std::path::Path;

use scm_core::{Address, AddressError};
use serde::{Deserialize, Serialize};

/// Program namespaces used for address derivation and account ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramIds {
    /// Owns sites, inspectors, devices and safety checks.
    pub registry: Address,
    /// Owns proof mints and vaults.
    pub token: Address,
    /// Namespace of vault addresses.
    pub associated_token: Address,
    /// Owns token metadata and master editions.
    pub metadata: Address,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            registry: Address::from_label("scm/safety-check-manager"),
            token: Address::from_label("scm/token"),
            associated_token: Address::from_label("scm/associated-token"),
            metadata: Address::from_label("scm/token-metadata"),
        }
    }
}

impl ProgramIds {
    /// Load program ids from a YAML file. Missing fields keep their default.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    /// Parse program ids from YAML text.
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Apply environment overrides on top of `self`.
    ///
    /// Variables (hex addresses):
    /// - `SCM_REGISTRY_PROGRAM`
    /// - `SCM_TOKEN_PROGRAM`
    /// - `SCM_ASSOCIATED_TOKEN_PROGRAM`
    /// - `SCM_METADATA_PROGRAM`
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    fn with_overrides(
        mut self,
        lookup: impl Fn(&'static str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let fields: [(&'static str, &mut Address); 4] = [
            ("SCM_REGISTRY_PROGRAM", &mut self.registry),
            ("SCM_TOKEN_PROGRAM", &mut self.token),
            ("SCM_ASSOCIATED_TOKEN_PROGRAM", &mut self.associated_token),
            ("SCM_METADATA_PROGRAM", &mut self.metadata),
        ];
        for (var, slot) in fields {
            if let Some(raw) = lookup(var) {
                *slot = Address::from_hex(&raw)
                    .map_err(|source| ConfigError::InvalidAddress { var, source })?;
            }
        }
        Ok(self)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file {path}: {source}")]
    Io {
        /// Path as given.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The config file is not valid YAML for [`ProgramIds`].
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// An environment override does not hold a hex address.
    #[error("invalid address in {var}: {source}")]
    InvalidAddress {
        /// Name of the environment variable.
        var: &'static str,
        /// Parse failure.
        #[source]
        source: AddressError,
    },
}
