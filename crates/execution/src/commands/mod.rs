//! Typed operations and the commands that prepare them.
//!
//! Every externally requested operation is a variant of [`Operation`]. Each
//! variant is handled by one [`Command`] that resolves registry and pool state,
//! plans the calls and builds the steps. The [`Orchestrator`] persists the result.

mod add_liquidity;
mod create_pool;
mod deploy;
mod orchestrator;
mod remove_liquidity;
mod swap;

pub use add_liquidity::{AddLiquidityCommand, AddLiquidityRequest, PairReserves};
pub use create_pool::{CreatePoolCommand, CreatePoolRequest};
pub use deploy::{
    DEFAULT_FACTORY_TEMPLATE, DEFAULT_ROUTER_TEMPLATE, DEFAULT_TOKEN_TEMPLATE,
    DeployFactoryCommand, DeployFactoryRequest, DeployRouterCommand, DeployRouterRequest,
    DeployTokenCommand, DeployTokenRequest,
};
pub use orchestrator::{Orchestrator, Ports, SessionTicket};
pub use remove_liquidity::{RemoveLiquidityCommand, RemoveLiquidityRequest};
pub use swap::{SwapCommand, SwapRequest};

use crate::builder::PlanBuilder;
use crate::config::PlannerConfig;
use crate::planner::RoutePlanner;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};

/// An operation requested by an external agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum Operation {
    CreatePool(CreatePoolRequest),
    AddLiquidity(AddLiquidityRequest),
    RemoveLiquidity(RemoveLiquidityRequest),
    Swap(SwapRequest),
    DeployToken(DeployTokenRequest),
    DeployFactory(DeployFactoryRequest),
    DeployRouter(DeployRouterRequest),
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::CreatePool(_) => CreatePoolCommand::KIND,
            Self::AddLiquidity(_) => AddLiquidityCommand::KIND,
            Self::RemoveLiquidity(_) => RemoveLiquidityCommand::KIND,
            Self::Swap(_) => SwapCommand::KIND,
            Self::DeployToken(_) => DeployTokenCommand::KIND,
            Self::DeployFactory(_) => DeployFactoryCommand::KIND,
            Self::DeployRouter(_) => DeployRouterCommand::KIND,
        }
    }
}

/// Everything a command may read while preparing a plan.
pub struct CommandContext<'a> {
    /// Chain the plan targets, already checked to be EVM.
    pub chain: &'a Chain,
    /// Plan creation time; router deadlines count from here.
    pub now: DateTime<Utc>,
    pub config: &'a PlannerConfig,
    pub deployments: &'a dyn DeploymentRegistry,
    pub pools: &'a dyn PoolStore,
    pub artifacts: &'a dyn ArtifactSource,
    pub builder: &'a PlanBuilder,
}

impl CommandContext<'_> {
    /// Deployment entry of the target chain.
    pub async fn deployment(&self) -> Result<DeploymentRegistryEntry> {
        self.deployments.by_chain(self.chain.id).await
    }

    /// Planner against the target chain's router deployment.
    pub fn planner(&self, deployment: &DeploymentRegistryEntry) -> Result<RoutePlanner> {
        RoutePlanner::new(deployment, self.now, self.config.deadline_secs)
    }

    /// Pool holding `a` and `b`. The native sentinel is looked up as the wrapped native token.
    pub async fn find_pool(
        &self,
        planner: &RoutePlanner,
        a: Address,
        b: Address,
    ) -> Result<Option<Pool>> {
        self.pools
            .by_token_pair(
                self.chain.id,
                pool_token(planner, a),
                pool_token(planner, b),
            )
            .await
    }

    /// Confirmed pool holding `a` and `b`.
    ///
    /// `NotFound` when no pool is known, `State` while it awaits confirmation.
    pub async fn require_pool(
        &self,
        planner: &RoutePlanner,
        a: Address,
        b: Address,
    ) -> Result<Pool> {
        let pool = self
            .find_pool(planner, a, b)
            .await?
            .ok_or_else(|| DexError::not_found("pool", format!("{a}/{b}")))?;
        pool.ensure_confirmed()?;
        Ok(pool)
    }
}

/// On-chain token a pool holds for `token`; the native coin is held as its wrapped form.
pub fn pool_token(planner: &RoutePlanner, token: Address) -> Address {
    if token.is_native() {
        planner.wrapped_native()
    } else {
        token
    }
}

/// Output of a command, ready to be persisted as a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPlan {
    pub steps: Vec<TransactionStep>,
    pub metadata: Metadata,
    /// Pool record to store once the session exists.
    pub pending_pool: Option<Pool>,
    /// Liquidity record to store, linked to the session.
    pub pending_position: Option<LiquidityPosition>,
}

impl PreparedPlan {
    pub fn new(steps: Vec<TransactionStep>, metadata: Metadata) -> Self {
        Self {
            steps,
            metadata,
            pending_pool: None,
            pending_position: None,
        }
    }

    #[must_use]
    pub fn with_pool(mut self, pool: Pool) -> Self {
        self.pending_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_position(mut self, position: LiquidityPosition) -> Self {
        self.pending_position = Some(position);
        self
    }
}

/// Prepares the steps for one kind of operation.
#[async_trait]
pub trait Command: Send + Sync {
    type Request: Send + Sync;

    const KIND: OperationKind;

    async fn prepare(&self, ctx: &CommandContext<'_>, request: &Self::Request)
    -> Result<PreparedPlan>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for command tests.

    use super::*;
    use crate::encoder::EthabiEncoder;
    use crate::store::InMemoryStore;
    use std::sync::Arc;

    pub const ROUTER: Address = Address::from_bytes([0xd0; 20]);
    pub const FACTORY: Address = Address::from_bytes([0xfa; 20]);
    pub const WETH: Address = Address::from_bytes([0xee; 20]);
    pub const TOKEN_A: Address = Address::from_bytes([0x0a; 20]);
    pub const TOKEN_B: Address = Address::from_bytes([0x0b; 20]);
    pub const USER: Address = Address::from_bytes([0x01; 20]);

    pub struct Harness {
        pub store: Arc<InMemoryStore>,
        pub chain: Chain,
        pub config: PlannerConfig,
        pub builder: PlanBuilder,
    }

    impl Harness {
        pub async fn new() -> Self {
            let store = Arc::new(InMemoryStore::new());
            let chain = Chain::new("anvil", ChainType::Ethereum, "http://localhost:8545", 31337);
            store.add_chain(chain.clone()).await;
            store
                .add_deployment(DeploymentRegistryEntry {
                    chain_id: chain.id,
                    factory_address: Some(FACTORY),
                    router_address: Some(ROUTER),
                    wrapped_native_address: Some(WETH),
                    version: "v2".into(),
                })
                .await;
            Self {
                store,
                chain,
                config: PlannerConfig::default(),
                builder: PlanBuilder::new(Arc::new(EthabiEncoder::new())),
            }
        }

        pub fn ctx(&self) -> CommandContext<'_> {
            CommandContext {
                chain: &self.chain,
                now: Utc::now(),
                config: &self.config,
                deployments: self.store.as_ref(),
                pools: self.store.as_ref(),
                artifacts: self.store.as_ref(),
                builder: &self.builder,
            }
        }

        /// Adds a pool; `confirmed` pools get a pair address.
        pub async fn add_pool(
            &self,
            a: Address,
            b: Address,
            amount_a: TokenAmount,
            amount_b: TokenAmount,
            confirmed: bool,
        ) -> Pool {
            let mut pool =
                Pool::new_pending(self.chain.id, a, b, amount_a, amount_b, "v2", Utc::now())
                    .unwrap();
            if confirmed {
                pool.status = ConfirmationStatus::Confirmed;
                pool.pair_address = Some(Address::from_bytes([0x99; 20]));
            }
            self.store.add_pool(pool.clone()).await;
            pool
        }
    }

    pub fn ether(n: u64) -> TokenAmount {
        TokenAmount::parse_units(&n.to_string(), NATIVE_DECIMALS).unwrap()
    }
}
