//! Interfaces to the collaborators the engine reads from and writes to.
//!
//! In-memory implementations live in `dexflow-execution`, PostgreSQL ones in
//! `dexflow-data`.

use crate::entities::{
    Chain, ContractArtifact, DeploymentRegistryEntry, LiquidityPosition, Pool, PositionId,
    SessionId, TransactionSession,
};
use crate::error::Result;
use crate::value_objects::Address;
use async_trait::async_trait;
use uuid::Uuid;

/// Registry of configured chains.
#[async_trait]
pub trait ChainRegistry: Send + Sync {
    /// Currently selected chain; `NotFound` when none is selected.
    async fn active_chain(&self) -> Result<Chain>;

    /// Chain by id; `NotFound` when absent.
    async fn by_id(&self, id: Uuid) -> Result<Chain>;
}

/// Per-chain DEX contract addresses.
#[async_trait]
pub trait DeploymentRegistry: Send + Sync {
    /// Deployment for a chain; `NotFound` when the chain has none.
    async fn by_chain(&self, chain_id: Uuid) -> Result<DeploymentRegistryEntry>;
}

/// Known pools.
///
/// Creation is not guarded against concurrent duplicates; when several pools match
/// a pair, implementations return a confirmed one first, otherwise the newest.
#[async_trait]
pub trait PoolStore: Send + Sync {
    async fn by_token_pair(&self, chain_id: Uuid, a: Address, b: Address) -> Result<Option<Pool>>;

    async fn create(&self, pool: Pool) -> Result<Uuid>;
}

/// Requested liquidity changes.
#[async_trait]
pub trait LiquidityStore: Send + Sync {
    async fn create(&self, position: LiquidityPosition) -> Result<PositionId>;
}

/// Persisted sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a session in a single write.
    async fn insert(&self, session: &TransactionSession) -> Result<()>;

    async fn get(&self, id: SessionId) -> Result<Option<TransactionSession>>;
}

/// Source of compiled contract templates.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Template by name; `External` when it cannot be retrieved.
    async fn artifact(&self, name: &str) -> Result<ContractArtifact>;
}
