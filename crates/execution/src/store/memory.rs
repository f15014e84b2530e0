use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Seed data for an [`InMemoryStore`], typically loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixture {
    pub chains: Vec<Chain>,
    /// Chain returned by `active_chain`; the first chain when unset.
    pub active_chain: Option<Uuid>,
    pub deployments: Vec<DeploymentRegistryEntry>,
    pub pools: Vec<Pool>,
    pub artifacts: Vec<ContractArtifact>,
}

impl Fixture {
    /// Chain to select as active: the configured one, else the first chain.
    pub fn active_chain_id(&self) -> Option<Uuid> {
        self.active_chain.or_else(|| self.chains.first().map(|c| c.id))
    }

    /// Checks that every reference points at a listed chain and every pool is well-formed.
    ///
    /// # Errors
    /// Returns `NotFound` for a dangling chain reference and the pool's own error when
    /// a pool breaks its invariants.
    pub fn validate(&self) -> Result<()> {
        let known = |id: Uuid| self.chains.iter().any(|c| c.id == id);
        if let Some(id) = self.active_chain.filter(|id| !known(*id)) {
            return Err(DexError::not_found("chain", id));
        }
        if let Some(entry) = self.deployments.iter().find(|d| !known(d.chain_id)) {
            return Err(DexError::not_found("chain", entry.chain_id));
        }
        for pool in &self.pools {
            if !known(pool.chain_id) {
                return Err(DexError::not_found("chain", pool.chain_id));
            }
            pool.validate()?;
        }
        Ok(())
    }
}

/// Every store port backed by `RwLock`ed maps.
#[derive(Default)]
pub struct InMemoryStore {
    chains: RwLock<HashMap<Uuid, Chain>>,
    active_chain: RwLock<Option<Uuid>>,
    deployments: RwLock<HashMap<Uuid, DeploymentRegistryEntry>>,
    pools: RwLock<Vec<Pool>>,
    positions: RwLock<HashMap<PositionId, LiquidityPosition>>,
    sessions: RwLock<HashMap<SessionId, TransactionSession>>,
    artifacts: RwLock<HashMap<String, ContractArtifact>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated from a fixture.
    pub async fn from_fixture(fixture: Fixture) -> Result<Self> {
        fixture.validate()?;
        let store = Self::new();
        let active = fixture.active_chain_id();
        for chain in fixture.chains {
            store.add_chain(chain).await;
        }
        if let Some(id) = active {
            store.set_active_chain(id).await?;
        }
        for deployment in fixture.deployments {
            store.add_deployment(deployment).await;
        }
        for pool in fixture.pools {
            store.add_pool(pool).await;
        }
        for artifact in fixture.artifacts {
            store.add_artifact(artifact).await;
        }
        Ok(store)
    }

    pub async fn add_chain(&self, chain: Chain) {
        self.chains.write().await.insert(chain.id, chain);
    }

    /// Selects the active chain; `NotFound` for an unknown id.
    pub async fn set_active_chain(&self, id: Uuid) -> Result<()> {
        if !self.chains.read().await.contains_key(&id) {
            return Err(DexError::not_found("chain", id));
        }
        *self.active_chain.write().await = Some(id);
        Ok(())
    }

    pub async fn add_deployment(&self, deployment: DeploymentRegistryEntry) {
        self.deployments
            .write()
            .await
            .insert(deployment.chain_id, deployment);
    }

    pub async fn add_pool(&self, pool: Pool) {
        self.pools.write().await.push(pool);
    }

    pub async fn add_artifact(&self, artifact: ContractArtifact) {
        self.artifacts
            .write()
            .await
            .insert(artifact.name.clone(), artifact);
    }

    /// Snapshot of every stored pool.
    pub async fn pools(&self) -> Vec<Pool> {
        self.pools.read().await.clone()
    }

    /// Snapshot of every stored liquidity position.
    pub async fn positions(&self) -> Vec<LiquidityPosition> {
        self.positions.read().await.values().cloned().collect()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl ChainRegistry for InMemoryStore {
    async fn active_chain(&self) -> Result<Chain> {
        let id = (*self.active_chain.read().await)
            .ok_or_else(|| DexError::not_found("chain", "active"))?;
        self.by_id(id).await
    }

    async fn by_id(&self, id: Uuid) -> Result<Chain> {
        self.chains
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| DexError::not_found("chain", id))
    }
}

#[async_trait]
impl DeploymentRegistry for InMemoryStore {
    async fn by_chain(&self, chain_id: Uuid) -> Result<DeploymentRegistryEntry> {
        self.deployments
            .read()
            .await
            .get(&chain_id)
            .cloned()
            .ok_or_else(|| DexError::not_found("deployment", chain_id))
    }
}

#[async_trait]
impl PoolStore for InMemoryStore {
    async fn by_token_pair(&self, chain_id: Uuid, a: Address, b: Address) -> Result<Option<Pool>> {
        let pools = self.pools.read().await;
        let best = pools
            .iter()
            .filter(|p| p.chain_id == chain_id && p.matches(a, b))
            .max_by_key(|p| (p.is_confirmed(), p.created_at));
        Ok(best.cloned())
    }

    async fn create(&self, pool: Pool) -> Result<Uuid> {
        pool.validate()?;
        let id = pool.id;
        debug!(pool_id = %id, token0 = %pool.token0, token1 = %pool.token1, "Pool stored");
        self.pools.write().await.push(pool);
        Ok(id)
    }
}

#[async_trait]
impl LiquidityStore for InMemoryStore {
    async fn create(&self, position: LiquidityPosition) -> Result<PositionId> {
        let id = position.id;
        self.positions.write().await.insert(id, position);
        Ok(id)
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn insert(&self, session: &TransactionSession) -> Result<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.id) {
            return Err(DexError::state(format!(
                "session {} already exists",
                session.id
            )));
        }
        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn get(&self, id: SessionId) -> Result<Option<TransactionSession>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl ArtifactSource for InMemoryStore {
    async fn artifact(&self, name: &str) -> Result<ContractArtifact> {
        self.artifacts
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| DexError::external(format!("contract template '{name}' is unavailable")))
    }
}
