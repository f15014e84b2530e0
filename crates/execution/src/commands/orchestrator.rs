use super::{
    AddLiquidityCommand, Command, CommandContext, CreatePoolCommand, DeployFactoryCommand,
    DeployRouterCommand, DeployTokenCommand, Operation, PreparedPlan, RemoveLiquidityCommand,
    SwapCommand,
};
use crate::builder::PlanBuilder;
use crate::config::PlannerConfig;
use crate::encoder::CallEncoder;
use crate::session::SessionManager;
use chrono::{DateTime, Utc};
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// The collaborators an [`Orchestrator`] reads from and writes to.
#[derive(Clone)]
pub struct Ports {
    pub chains: Arc<dyn ChainRegistry>,
    pub deployments: Arc<dyn DeploymentRegistry>,
    pub pools: Arc<dyn PoolStore>,
    pub positions: Arc<dyn LiquidityStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub artifacts: Arc<dyn ArtifactSource>,
}

impl Ports {
    /// Uses one store for every port.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ChainRegistry
            + DeploymentRegistry
            + PoolStore
            + LiquidityStore
            + SessionStore
            + ArtifactSource
            + 'static,
    {
        Self {
            chains: store.clone(),
            deployments: store.clone(),
            pools: store.clone(),
            positions: store.clone(),
            sessions: store.clone(),
            artifacts: store,
        }
    }
}

/// What the requesting agent receives: where to sign and what will be signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTicket {
    pub session_id: SessionId,
    pub signing_url: String,
    pub steps: Vec<TransactionStep>,
}

/// Dispatches operations to their commands and persists the resulting sessions.
pub struct Orchestrator {
    ports: Ports,
    sessions: SessionManager,
    builder: PlanBuilder,
    config: PlannerConfig,
}

impl Orchestrator {
    /// Creates a new orchestrator.
    pub fn new(ports: Ports, encoder: Arc<dyn CallEncoder>, config: PlannerConfig) -> Self {
        let sessions =
            SessionManager::new(ports.sessions.clone(), config.signing_base_url.clone());
        Self {
            ports,
            sessions,
            builder: PlanBuilder::new(encoder),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Session manager backing this orchestrator.
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// The requested chain, or the registry's active chain when none is given.
    pub async fn resolve_chain(&self, chain_id: Option<Uuid>) -> Result<Chain> {
        match chain_id {
            Some(id) => self.ports.chains.by_id(id).await,
            None => self.ports.chains.active_chain().await,
        }
    }

    /// Prepares and persists `operation`.
    pub async fn execute(
        &self,
        operation: Operation,
        chain_id: Option<Uuid>,
    ) -> Result<SessionTicket> {
        self.execute_at(operation, chain_id, Utc::now()).await
    }

    /// Same as [`execute`](Self::execute) with an explicit plan creation time.
    pub async fn execute_at(
        &self,
        operation: Operation,
        chain_id: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> Result<SessionTicket> {
        let kind = operation.kind();
        let chain = self.resolve_chain(chain_id).await?;
        chain.ensure_evm()?;

        let ctx = CommandContext {
            chain: &chain,
            now,
            config: &self.config,
            deployments: self.ports.deployments.as_ref(),
            pools: self.ports.pools.as_ref(),
            artifacts: self.ports.artifacts.as_ref(),
            builder: &self.builder,
        };

        let prepared = match &operation {
            Operation::CreatePool(request) => run(&CreatePoolCommand, &ctx, request).await,
            Operation::AddLiquidity(request) => run(&AddLiquidityCommand, &ctx, request).await,
            Operation::RemoveLiquidity(request) => {
                run(&RemoveLiquidityCommand, &ctx, request).await
            }
            Operation::Swap(request) => run(&SwapCommand, &ctx, request).await,
            Operation::DeployToken(request) => run(&DeployTokenCommand, &ctx, request).await,
            Operation::DeployFactory(request) => run(&DeployFactoryCommand, &ctx, request).await,
            Operation::DeployRouter(request) => run(&DeployRouterCommand, &ctx, request).await,
        };
        let PreparedPlan {
            steps,
            mut metadata,
            pending_pool,
            pending_position,
        } = prepared.inspect_err(|e| {
            error!(
                operation = %kind,
                chain = %chain.name,
                error = %e,
                "Failed to prepare operation"
            );
        })?;

        metadata.prepend("chain_id", chain.id);
        metadata.prepend("operation", kind.as_str());

        // The session is stored last; a failed write above leaves nothing to sign.
        let session_id = SessionId::generate();
        let session =
            SessionManager::draft(session_id, steps, chain.chain_type, chain.id, metadata, now)?;

        if let Some(pool) = pending_pool {
            let pool_id = self.ports.pools.create(pool).await?;
            info!(session_id = %session_id, pool_id = %pool_id, "Pending pool recorded");
        }
        if let Some(position) = pending_position {
            let position_id = self
                .ports
                .positions
                .create(position.for_session(session_id))
                .await?;
            info!(
                session_id = %session_id,
                position_id = %position_id.0,
                "Pending liquidity change recorded"
            );
        }
        self.sessions.store(&session).await?;

        info!(
            operation = %kind,
            session_id = %session_id,
            steps = session.steps.len(),
            "Operation ready for signing"
        );

        Ok(SessionTicket {
            session_id,
            signing_url: self.sessions.signing_url(session_id),
            steps: session.steps,
        })
    }
}

async fn run<C: Command>(
    command: &C,
    ctx: &CommandContext<'_>,
    request: &C::Request,
) -> Result<PreparedPlan> {
    info!(operation = %C::KIND, chain = %ctx.chain.name, "Preparing operation");
    command.prepare(ctx, request).await
}
