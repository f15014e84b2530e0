use crate::enums::ChainType;
use crate::error::{DexError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chain {
    pub id: Uuid,
    pub name: String,
    pub chain_type: ChainType,
    pub rpc_url: String,
    /// EIP-155 network id.
    pub network_id: u64,
}

impl Chain {
    pub fn new(
        name: impl Into<String>,
        chain_type: ChainType,
        rpc_url: impl Into<String>,
        network_id: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            chain_type,
            rpc_url: rpc_url.into(),
            network_id,
        }
    }

    /// Fails unless DEX plans can be built for this chain.
    pub fn ensure_evm(&self) -> Result<()> {
        if self.chain_type.is_evm() {
            Ok(())
        } else {
            Err(DexError::validation(format!(
                "chain '{}' is {} and does not support EVM DEX operations",
                self.name, self.chain_type
            )))
        }
    }
}
