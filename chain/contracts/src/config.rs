//! Vault construction parameters

use assetbox_types::ids::Address;
use serde::{Deserialize, Serialize};

use crate::errors::VaultError;

/// Name a vault reports when none is configured.
pub const DEFAULT_NAME: &str = "AssetBox";

/// Configuration for a new vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBoxConfig {
    /// Human-readable vault name
    pub name: String,
    /// Initial owner (the bootstrap principal)
    pub owner: Address,
    /// Distinguishes several vaults deployed for the same owner
    pub salt: u64,
}

impl AssetBoxConfig {
    /// Create a config with the default name and salt.
    pub fn new(owner: Address) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            owner,
            salt: 0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_salt(mut self, salt: u64) -> Self {
        self.salt = salt;
        self
    }

    /// Reject a null owner or an empty name.
    pub fn validate(&self) -> Result<(), VaultError> {
        if self.owner.is_zero() {
            return Err(VaultError::InvalidOwner { owner: self.owner });
        }
        if self.name.trim().is_empty() {
            return Err(VaultError::InvalidConfig {
                reason: "vault name must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Deterministic address of the vault this config deploys.
    pub fn vault_address(&self) -> Address {
        Address::derive(&[
            self.name.as_bytes(),
            self.owner.as_bytes(),
            &self.salt.to_be_bytes(),
        ])
    }
}
