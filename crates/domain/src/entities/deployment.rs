use crate::error::{DexError, Result};
use crate::value_objects::Address;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// DEX contracts provisioned on one chain. Read-only to the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRegistryEntry {
    pub chain_id: Uuid,
    pub factory_address: Option<Address>,
    pub router_address: Option<Address>,
    pub wrapped_native_address: Option<Address>,
    pub version: String,
}

impl DeploymentRegistryEntry {
    pub fn require_factory(&self) -> Result<Address> {
        self.factory_address
            .ok_or_else(|| self.not_provisioned("factory"))
    }

    pub fn require_router(&self) -> Result<Address> {
        self.router_address.ok_or_else(|| self.not_provisioned("router"))
    }

    pub fn require_wrapped_native(&self) -> Result<Address> {
        self.wrapped_native_address
            .ok_or_else(|| self.not_provisioned("wrapped native token"))
    }

    fn not_provisioned(&self, contract: &str) -> DexError {
        DexError::state(format!(
            "{contract} is not deployed on chain {} (deployment {})",
            self.chain_id, self.version
        ))
    }
}
