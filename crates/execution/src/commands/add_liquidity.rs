use super::{Command, CommandContext, PreparedPlan, pool_token};
use crate::planner::{AddLiquidityLeg, PairRoute};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::math::{minimum_amount, quote};
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Current pool reserves in the request's token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReserves {
    pub reserve_a: TokenAmount,
    pub reserve_b: TokenAmount,
}

/// Deposit both tokens into an existing pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLiquidityRequest {
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a: TokenAmount,
    pub amount_b: TokenAmount,
    /// Receiver of the LP tokens.
    pub recipient: Address,
    #[serde(default)]
    pub slippage: Option<Percentage>,
    /// Live reserves; the pool's seed amounts are used when absent.
    #[serde(default)]
    pub reserves: Option<PairReserves>,
}

/// Adds liquidity to a confirmed pool.
pub struct AddLiquidityCommand;

#[async_trait]
impl Command for AddLiquidityCommand {
    type Request = AddLiquidityRequest;

    const KIND: OperationKind = OperationKind::AddLiquidity;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &AddLiquidityRequest,
    ) -> Result<PreparedPlan> {
        let route = PairRoute::for_liquidity(request.token_a, request.token_b)?;
        if request.amount_a.is_zero() || request.amount_b.is_zero() {
            return Err(DexError::validation(
                "both deposit amounts must be positive",
            ));
        }
        let slippage = ctx.config.slippage_or_default(request.slippage)?;

        let deployment = ctx.deployment().await?;
        let planner = ctx.planner(&deployment)?;
        let pool = ctx
            .require_pool(&planner, request.token_a, request.token_b)
            .await?;

        let (reserves, reserve_source) = match request.reserves {
            Some(reserves) => (reserves, "caller"),
            None => {
                let seed = pool
                    .seed_reserves_for(pool_token(&planner, request.token_a))
                    .ok_or_else(|| {
                        DexError::state(format!(
                            "pool {} does not hold {}",
                            pool.id, request.token_a
                        ))
                    })?;
                warn!(
                    pool_id = %pool.id,
                    "No live reserves supplied; sizing the deposit from seed amounts"
                );
                (
                    PairReserves {
                        reserve_a: seed.reserve_in,
                        reserve_b: seed.reserve_out,
                    },
                    "seed",
                )
            }
        };

        // The router deposits at the pool ratio, capped by the desired amounts.
        let amount_b_optimal = quote(request.amount_a, reserves.reserve_a, reserves.reserve_b)?;
        let (amount_a_used, amount_b_used) = if amount_b_optimal <= request.amount_b {
            (request.amount_a, amount_b_optimal)
        } else {
            let amount_a_optimal =
                quote(request.amount_b, reserves.reserve_b, reserves.reserve_a)?;
            (amount_a_optimal, request.amount_b)
        };

        let leg = AddLiquidityLeg {
            token_a: request.token_a,
            token_b: request.token_b,
            amount_a_desired: request.amount_a,
            amount_b_desired: request.amount_b,
            amount_a_min: minimum_amount(amount_a_used, slippage)?,
            amount_b_min: minimum_amount(amount_b_used, slippage)?,
            recipient: request.recipient,
            seeds_new_pool: false,
        };
        let plan = planner.add_liquidity(route, &leg)?;
        let steps = ctx.builder.build(&plan)?;

        let position = LiquidityPosition::pending(
            pool.id,
            Some(request.recipient),
            amount_a_used,
            amount_b_used,
            TokenAmount::zero(),
            LiquidityAction::Add,
            ctx.now,
        );

        info!(
            pool_id = %pool.id,
            route = route.as_str(),
            reserve_source,
            "Prepared liquidity add"
        );

        let metadata = Metadata::new()
            .with("route", route.as_str())
            .with("pool_id", pool.id)
            .with("token_a", request.token_a)
            .with("token_b", request.token_b)
            .with("amount_a", amount_a_used)
            .with("amount_b", amount_b_used)
            .with("amount_a_min", leg.amount_a_min)
            .with("amount_b_min", leg.amount_b_min)
            .with("slippage_pct", slippage.value())
            .with("reserve_source", reserve_source)
            .with("router", plan.router)
            .with("deadline", plan.deadline);

        Ok(PreparedPlan::new(steps, metadata).with_position(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    fn request(token_a: Address, token_b: Address) -> AddLiquidityRequest {
        AddLiquidityRequest {
            token_a,
            token_b,
            amount_a: TokenAmount::from(1_000u64),
            amount_b: TokenAmount::from(1_000u64),
            recipient: USER,
            slippage: None,
            reserves: None,
        }
    }

    #[tokio::test]
    async fn test_native_pair_two_steps_with_seed_reserves() {
        let harness = Harness::new().await;
        harness
            .add_pool(
                TOKEN_A,
                WETH,
                TokenAmount::from(5_000u64),
                TokenAmount::from(5_000u64),
                true,
            )
            .await;

        let plan = AddLiquidityCommand
            .prepare(&harness.ctx(), &request(TOKEN_A, Address::NATIVE))
            .await
            .unwrap();

        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].value(), TokenAmount::from(1_000u64));
        assert_eq!(
            plan.metadata.get("reserve_source"),
            Some(&MetadataValue::Text("seed".into()))
        );
        assert_eq!(
            plan.metadata.get("amount_a_min"),
            Some(&MetadataValue::Amount(TokenAmount::from(990u64)))
        );
        assert_eq!(
            plan.metadata.get("amount_b_min"),
            Some(&MetadataValue::Amount(TokenAmount::from(990u64)))
        );
    }

    #[tokio::test]
    async fn test_token_pair_three_steps_with_caller_reserves() {
        let harness = Harness::new().await;
        harness
            .add_pool(TOKEN_A, TOKEN_B, ether(1), ether(1), true)
            .await;

        let mut req = request(TOKEN_A, TOKEN_B);
        req.reserves = Some(PairReserves {
            reserve_a: TokenAmount::from(2_000u64),
            reserve_b: TokenAmount::from(1_000u64),
        });
        let plan = AddLiquidityCommand
            .prepare(&harness.ctx(), &req)
            .await
            .unwrap();

        assert_eq!(plan.steps.len(), 3);
        let position = plan.pending_position.unwrap();
        // 1000 A matches 500 B at a 2:1 ratio
        assert_eq!(position.amount0, TokenAmount::from(1_000u64));
        assert_eq!(position.amount1, TokenAmount::from(500u64));
        assert_eq!(
            plan.metadata.get("reserve_source"),
            Some(&MetadataValue::Text("caller".into()))
        );
    }

    #[tokio::test]
    async fn test_missing_and_pending_pools() {
        let harness = Harness::new().await;
        let err = AddLiquidityCommand
            .prepare(&harness.ctx(), &request(TOKEN_A, TOKEN_B))
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::NotFound { entity: "pool", .. }));

        harness
            .add_pool(TOKEN_A, TOKEN_B, ether(1), ether(1), false)
            .await;
        let err = AddLiquidityCommand
            .prepare(&harness.ctx(), &request(TOKEN_A, TOKEN_B))
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::State(_)));
    }
}
