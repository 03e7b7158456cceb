//! # Registry Configuration
//!
//! Capacity hints, loaded once at startup from TOML.
//!
//! ```toml
//! entity_capacity = 100000
//! pool_capacity = 4096
//! ```
//!
//! Missing keys fall back to their defaults. Configuration only affects
//! allocation, never which entities hold which components.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, RegistryResult};

/// Capacity hints for a [`Registry`](crate::Registry).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Entities to reserve mask storage for.
    pub entity_capacity: usize,
    /// Reserve hint applied to every pool when it is first created.
    pub pool_capacity: usize,
}

impl RegistryConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfig`] if the text is not valid
    /// TOML or contains unknown keys.
    pub fn from_toml_str(text: &str) -> RegistryResult<Self> {
        toml::from_str(text).map_err(|e| RegistryError::InvalidConfig(e.to_string()))
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfig`] if the file cannot be read
    /// or parsed.
    pub fn load(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| RegistryError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            entity_capacity = config.entity_capacity,
            pool_capacity = config.pool_capacity,
            "loaded registry config"
        );
        Ok(config)
    }

    /// Serializes the configuration to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> RegistryResult<String> {
        toml::to_string(self).map_err(|e| RegistryError::InvalidConfig(e.to_string()))
    }
}
