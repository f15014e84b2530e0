use super::{Command, CommandContext, PreparedPlan, pool_token};
use crate::planner::{AddLiquidityLeg, PairRoute};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::math::{initial_price, minimum_amount};
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Create a new pool by seeding it with both tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePoolRequest {
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
    /// Receiver of the LP tokens.
    pub recipient: Address,
    #[serde(default)]
    pub slippage: Option<Percentage>,
}

/// Seeds a pool through the router, which creates the pair on first deposit.
pub struct CreatePoolCommand;

#[async_trait]
impl Command for CreatePoolCommand {
    type Request = CreatePoolRequest;

    const KIND: OperationKind = OperationKind::CreatePool;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &CreatePoolRequest,
    ) -> Result<PreparedPlan> {
        let route = PairRoute::for_liquidity(request.token_a, request.token_b)?;
        if request.amount_a.is_zero() || request.amount_b.is_zero() {
            return Err(DexError::validation(
                "both seed amounts must be positive",
            ));
        }
        let slippage = ctx.config.slippage_or_default(request.slippage)?;

        let deployment = ctx.deployment().await?;
        let planner = ctx.planner(&deployment)?;

        if let Some(existing) = ctx
            .find_pool(&planner, request.token_a, request.token_b)
            .await?
        {
            if existing.is_confirmed() {
                return Err(DexError::state(format!(
                    "pool {} for {}/{} already exists",
                    existing.id, request.token_a, request.token_b
                )));
            }
            warn!(
                pool_id = %existing.id,
                "A pending pool exists for this pair; preparing another creation"
            );
        }

        let price = initial_price(request.amount_a, request.amount_b, NATIVE_DECIMALS)?;
        let leg = AddLiquidityLeg {
            token_a: request.token_a,
            token_b: request.token_b,
            amount_a_desired: request.amount_a,
            amount_b_desired: request.amount_b,
            amount_a_min: minimum_amount(request.amount_a, slippage)?,
            amount_b_min: minimum_amount(request.amount_b, slippage)?,
            recipient: request.recipient,
            seeds_new_pool: true,
        };
        let plan = planner.add_liquidity(route, &leg)?;
        let steps = ctx.builder.build(&plan)?;

        let pool = Pool::new_pending(
            ctx.chain.id,
            pool_token(&planner, request.token_a),
            pool_token(&planner, request.token_b),
            request.amount_a,
            request.amount_b,
            deployment.version.clone(),
            ctx.now,
        )?;
        let position = LiquidityPosition::pending(
            pool.id,
            Some(request.recipient),
            request.amount_a,
            request.amount_b,
            TokenAmount::zero(),
            LiquidityAction::Add,
            ctx.now,
        );

        info!(
            pool_id = %pool.id,
            token_a = %request.token_a,
            token_b = %request.token_b,
            initial_price = %price.display,
            "Prepared pool creation"
        );

        let metadata = Metadata::new()
            .with("route", route.as_str())
            .with("pool_id", pool.id)
            .with("token_a", request.token_a)
            .with("token_b", request.token_b)
            .with("amount_a", request.amount_a)
            .with("amount_b", request.amount_b)
            .with("amount_a_min", leg.amount_a_min)
            .with("amount_b_min", leg.amount_b_min)
            .with("initial_price", price.display.clone())
            .with("initial_price_scaled", price.scaled)
            .with("slippage_pct", slippage.value())
            .with("router", plan.router)
            .with("factory", planner.factory())
            .with("deadline", plan.deadline);

        Ok(PreparedPlan::new(steps, metadata)
            .with_pool(pool)
            .with_position(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    fn request(token_a: Address, token_b: Address) -> CreatePoolRequest {
        CreatePoolRequest {
            token_a,
            token_b,
            amount_a: ether(100_000),
            amount_b: ether(100),
            recipient: USER,
            slippage: None,
        }
    }

    #[tokio::test]
    async fn test_native_pool_creation() {
        let harness = Harness::new().await;
        let plan = CreatePoolCommand
            .prepare(&harness.ctx(), &request(TOKEN_A, Address::NATIVE))
            .await
            .unwrap();

        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].title(), "Create Pool and Add Liquidity");
        assert_eq!(plan.steps[1].value(), ether(100));

        let pool = plan.pending_pool.unwrap();
        assert_eq!(pool.token1, WETH);
        assert_eq!(pool.status, ConfirmationStatus::Pending);
        assert_eq!(
            plan.metadata.get("initial_price").unwrap().to_string(),
            "0.00100000"
        );
        assert_eq!(
            plan.metadata.get("amount_a_min"),
            Some(&MetadataValue::Amount(ether(99_000)))
        );
        assert_eq!(plan.pending_position.unwrap().pool_id, pool.id);
    }

    #[tokio::test]
    async fn test_token_pool_creation_has_three_steps() {
        let harness = Harness::new().await;
        let plan = CreatePoolCommand
            .prepare(&harness.ctx(), &request(TOKEN_A, TOKEN_B))
            .await
            .unwrap();
        assert_eq!(plan.steps.len(), 3);
    }

    #[tokio::test]
    async fn test_confirmed_pool_is_duplicate() {
        let harness = Harness::new().await;
        harness
            .add_pool(TOKEN_A, WETH, ether(1), ether(1), true)
            .await;
        let err = CreatePoolCommand
            .prepare(&harness.ctx(), &request(Address::NATIVE, TOKEN_A))
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::State(_)));
    }

    #[tokio::test]
    async fn test_pending_pool_does_not_block() {
        let harness = Harness::new().await;
        harness
            .add_pool(TOKEN_A, TOKEN_B, ether(1), ether(1), false)
            .await;
        assert!(
            CreatePoolCommand
                .prepare(&harness.ctx(), &request(TOKEN_A, TOKEN_B))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_identical_tokens_rejected() {
        let harness = Harness::new().await;
        let err = CreatePoolCommand
            .prepare(&harness.ctx(), &request(TOKEN_A, TOKEN_A))
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::Validation(_)));
    }
}
