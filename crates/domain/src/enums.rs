use crate::error::DexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status shared by pools, liquidity positions and sessions.
///
/// Only an external chain-confirmation watcher moves a record out of `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Confirmed,
    Failed,
}

impl ConfirmationStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfirmationStatus {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            other => Err(DexError::validation(format!("unknown status '{other}'"))),
        }
    }
}

/// Family of a configured chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainType {
    Ethereum,
    Solana,
}

impl ChainType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Solana => "solana",
        }
    }

    /// Whether the chain executes EVM bytecode.
    #[must_use]
    pub fn is_evm(&self) -> bool {
        matches!(self, Self::Ethereum)
    }
}

impl fmt::Display for ChainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainType {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ethereum" | "evm" => Ok(Self::Ethereum),
            "solana" => Ok(Self::Solana),
            other => Err(DexError::validation(format!("unknown chain type '{other}'"))),
        }
    }
}

/// Tag shown to the signer describing what a step does on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Plain contract call such as an ERC-20 approval.
    Regular,
    TokenDeployment,
    FactoryDeployment,
    RouterDeployment,
    LiquidityAdd,
    LiquidityRemove,
    Swap,
}

impl TransactionType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::TokenDeployment => "token_deployment",
            Self::FactoryDeployment => "factory_deployment",
            Self::RouterDeployment => "router_deployment",
            Self::LiquidityAdd => "liquidity_add",
            Self::LiquidityRemove => "liquidity_remove",
            Self::Swap => "swap",
        }
    }

    /// Whether the step creates a contract (blank receiver).
    #[must_use]
    pub fn is_deployment(&self) -> bool {
        matches!(
            self,
            Self::TokenDeployment | Self::FactoryDeployment | Self::RouterDeployment
        )
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a liquidity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityAction {
    Add,
    Remove,
}

impl LiquidityAction {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl FromStr for LiquidityAction {
    type Err = DexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(DexError::validation(format!(
                "unknown liquidity action '{other}'"
            ))),
        }
    }
}

/// Operations an agent can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    CreatePool,
    AddLiquidity,
    RemoveLiquidity,
    Swap,
    DeployToken,
    DeployFactory,
    DeployRouter,
}

impl OperationKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreatePool => "create_pool",
            Self::AddLiquidity => "add_liquidity",
            Self::RemoveLiquidity => "remove_liquidity",
            Self::Swap => "swap",
            Self::DeployToken => "deploy_token",
            Self::DeployFactory => "deploy_factory",
            Self::DeployRouter => "deploy_router",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_through_str() {
        for status in [
            ConfirmationStatus::Pending,
            ConfirmationStatus::Confirmed,
            ConfirmationStatus::Failed,
        ] {
            assert_eq!(status.as_str().parse::<ConfirmationStatus>().unwrap(), status);
        }
        assert!("done".parse::<ConfirmationStatus>().is_err());
    }

    #[test]
    fn test_transaction_type_wire_name() {
        let json = serde_json::to_string(&TransactionType::TokenDeployment).unwrap();
        assert_eq!(json, "\"token_deployment\"");
        assert!(TransactionType::RouterDeployment.is_deployment());
        assert!(!TransactionType::Regular.is_deployment());
    }

    #[test]
    fn test_chain_type_is_evm() {
        assert!("Ethereum".parse::<ChainType>().unwrap().is_evm());
        assert!(!ChainType::Solana.is_evm());
    }
}
