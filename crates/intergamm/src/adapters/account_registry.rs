//! In-Memory Account Registry Adapter
//!
//! Implements `AccountRegistry`. Registration completes immediately and
//! derives a deterministic bech32 address from the owner and connection.

use crate::domain::IntergammError;
use crate::ports::outbound::AccountRegistry;
use bech32::{Bech32, Hrp};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::info;

/// Prefix of derived interchain account addresses.
pub const DERIVED_ADDRESS_HRP: &str = "ica";

/// In-memory interchain account registry.
#[derive(Default)]
pub struct InMemoryAccountRegistry {
    /// (owner, connection) -> address.
    accounts: RwLock<HashMap<(String, String), String>>,
    /// Registration attempts, in call order.
    registrations: RwLock<Vec<(String, String)>>,
}

impl InMemoryAccountRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an already-registered account.
    pub fn insert(&self, owner: &str, connection_id: &str, address: &str) {
        self.accounts.write().insert(
            (owner.to_string(), connection_id.to_string()),
            address.to_string(),
        );
    }

    /// Number of registration calls received.
    pub fn registration_count(&self) -> usize {
        self.registrations.read().len()
    }
}

fn derive_address(owner: &str, connection_id: &str) -> Result<String, IntergammError> {
    let mut hasher = Sha256::new();
    hasher.update(owner.as_bytes());
    hasher.update(b"/");
    hasher.update(connection_id.as_bytes());
    let digest = hasher.finalize();

    let hrp = Hrp::parse(DERIVED_ADDRESS_HRP)
        .map_err(|e| IntergammError::Serialization(e.to_string()))?;
    bech32::encode::<Bech32>(hrp, &digest[..20])
        .map_err(|e| IntergammError::Serialization(e.to_string()))
}

impl AccountRegistry for InMemoryAccountRegistry {
    fn interchain_account_address(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<String, IntergammError> {
        self.accounts
            .read()
            .get(&(owner.to_string(), connection_id.to_string()))
            .cloned()
            .ok_or_else(|| IntergammError::ica_not_found(owner, connection_id))
    }

    fn register_interchain_account(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<(), IntergammError> {
        if owner.is_empty() {
            return Err(IntergammError::invalid_address(owner, "owner cannot be empty"));
        }
        self.registrations
            .write()
            .push((owner.to_string(), connection_id.to_string()));

        let key = (owner.to_string(), connection_id.to_string());
        if self.accounts.read().contains_key(&key) {
            return Ok(());
        }
        let address = derive_address(owner, connection_id)?;
        info!(
            owner = %owner,
            connection_id = %connection_id,
            address = %address,
            "[intergamm] Interchain account registered"
        );
        self.accounts.write().insert(key, address);
        Ok(())
    }
}
