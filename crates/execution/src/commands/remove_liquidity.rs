use super::{Command, CommandContext, PreparedPlan};
use crate::planner::{PairRoute, RemoveLiquidityLeg};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::math::minimum_amount;
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Burn LP tokens for the underlying pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLiquidityRequest {
    pub token_a: Address,
    pub token_b: Address,
    /// LP tokens to burn.
    pub liquidity: TokenAmount,
    /// Expected withdrawal of token A; zero accepts any amount.
    #[serde(default)]
    pub amount_a: TokenAmount,
    /// Expected withdrawal of token B; zero accepts any amount.
    #[serde(default)]
    pub amount_b: TokenAmount,
    /// Receiver of the withdrawn tokens.
    pub recipient: Address,
    #[serde(default)]
    pub slippage: Option<Percentage>,
}

/// Removes liquidity from a confirmed pool.
pub struct RemoveLiquidityCommand;

#[async_trait]
impl Command for RemoveLiquidityCommand {
    type Request = RemoveLiquidityRequest;

    const KIND: OperationKind = OperationKind::RemoveLiquidity;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &RemoveLiquidityRequest,
    ) -> Result<PreparedPlan> {
        let route = PairRoute::for_liquidity(request.token_a, request.token_b)?;
        if request.liquidity.is_zero() {
            return Err(DexError::validation("liquidity to remove must be positive"));
        }
        let slippage = ctx.config.slippage_or_default(request.slippage)?;

        let deployment = ctx.deployment().await?;
        let planner = ctx.planner(&deployment)?;
        let pool = ctx
            .require_pool(&planner, request.token_a, request.token_b)
            .await?;
        let pair = pool.require_pair_address()?;

        let leg = RemoveLiquidityLeg {
            token_a: request.token_a,
            token_b: request.token_b,
            pair,
            liquidity: request.liquidity,
            amount_a_min: minimum_amount(request.amount_a, slippage)?,
            amount_b_min: minimum_amount(request.amount_b, slippage)?,
            recipient: request.recipient,
        };
        let plan = planner.remove_liquidity(route, &leg)?;
        let steps = ctx.builder.build(&plan)?;

        let position = LiquidityPosition::pending(
            pool.id,
            Some(request.recipient),
            request.amount_a,
            request.amount_b,
            request.liquidity,
            LiquidityAction::Remove,
            ctx.now,
        );

        info!(
            pool_id = %pool.id,
            pair = %pair,
            liquidity = %request.liquidity,
            "Prepared liquidity removal"
        );

        let metadata = Metadata::new()
            .with("route", route.as_str())
            .with("pool_id", pool.id)
            .with("pair", pair)
            .with("token_a", request.token_a)
            .with("token_b", request.token_b)
            .with("liquidity", request.liquidity)
            .with("amount_a_min", leg.amount_a_min)
            .with("amount_b_min", leg.amount_b_min)
            .with("slippage_pct", slippage.value())
            .with("router", plan.router)
            .with("deadline", plan.deadline);

        Ok(PreparedPlan::new(steps, metadata).with_position(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    fn request(token_a: Address, token_b: Address) -> RemoveLiquidityRequest {
        RemoveLiquidityRequest {
            token_a,
            token_b,
            liquidity: TokenAmount::from(400u64),
            amount_a: TokenAmount::from(1_000u64),
            amount_b: TokenAmount::from(1_000u64),
            recipient: USER,
            slippage: None,
        }
    }

    #[tokio::test]
    async fn test_native_removal() {
        let harness = Harness::new().await;
        let pool = harness
            .add_pool(WETH, TOKEN_B, ether(1), ether(1), true)
            .await;

        let plan = RemoveLiquidityCommand
            .prepare(&harness.ctx(), &request(Address::NATIVE, TOKEN_B))
            .await
            .unwrap();

        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[0].title(), "Approve LP Token for Router");
        assert_eq!(plan.steps[0].receiver(), pool.pair_address);
        assert_eq!(plan.steps[1].selector(), Some("0x02751cec"));
        assert_eq!(
            plan.metadata.get("amount_a_min"),
            Some(&MetadataValue::Amount(TokenAmount::from(990u64)))
        );

        let position = plan.pending_position.unwrap();
        assert_eq!(position.action, LiquidityAction::Remove);
        assert_eq!(position.liquidity, TokenAmount::from(400u64));
    }

    #[tokio::test]
    async fn test_token_removal() {
        let harness = Harness::new().await;
        harness
            .add_pool(TOKEN_A, TOKEN_B, ether(1), ether(1), true)
            .await;
        let plan = RemoveLiquidityCommand
            .prepare(&harness.ctx(), &request(TOKEN_B, TOKEN_A))
            .await
            .unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].selector(), Some("0xbaa2abde"));
        assert_eq!(
            plan.steps[1].transaction_type(),
            TransactionType::LiquidityRemove
        );
    }

    #[tokio::test]
    async fn test_zero_liquidity_rejected() {
        let harness = Harness::new().await;
        let mut req = request(TOKEN_A, TOKEN_B);
        req.liquidity = TokenAmount::zero();
        let err = RemoveLiquidityCommand
            .prepare(&harness.ctx(), &req)
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::Validation(_)));
    }
}
