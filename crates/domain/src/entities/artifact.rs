use serde::{Deserialize, Serialize};

/// Compiled contract template: ABI plus creation bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractArtifact {
    pub name: String,
    /// ABI JSON array.
    pub abi: String,
    /// 0x-prefixed creation bytecode.
    pub bytecode: String,
}
