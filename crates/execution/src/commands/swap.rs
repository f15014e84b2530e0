use super::{Command, CommandContext, PreparedPlan, pool_token};
use crate::planner::{PairRoute, RoutePlanner, SwapLeg};
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::math::{minimum_amount, price_impact_percent, routed_swap_output};
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Exact-input swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: TokenAmount,
    /// Receiver of the output tokens.
    pub recipient: Address,
    #[serde(default)]
    pub slippage: Option<Percentage>,
    /// Live reserves of each hop along the path; seed amounts are used when absent.
    #[serde(default)]
    pub reserves: Option<Vec<HopReserves>>,
}

/// Swaps through a direct pool or via the wrapped native token.
pub struct SwapCommand;

#[async_trait]
impl Command for SwapCommand {
    type Request = SwapRequest;

    const KIND: OperationKind = OperationKind::Swap;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &SwapRequest,
    ) -> Result<PreparedPlan> {
        // Rejects identical and native-to-native pairs before any lookup.
        PairRoute::for_liquidity(request.token_in, request.token_out)?;
        if request.amount_in.is_zero() {
            return Err(DexError::validation("swap amount must be positive"));
        }
        let slippage = ctx.config.slippage_or_default(request.slippage)?;

        let deployment = ctx.deployment().await?;
        let planner = ctx.planner(&deployment)?;

        let direct = ctx
            .find_pool(&planner, request.token_in, request.token_out)
            .await?;
        if let Some(pool) = &direct {
            pool.ensure_confirmed()?;
        }
        let route = PairRoute::for_swap(
            request.token_in,
            request.token_out,
            direct.is_some(),
            planner.wrapped_native(),
        )?;

        let hops = hop_pools(ctx, &planner, route, request, direct).await?;
        let (reserves, reserve_source) = match &request.reserves {
            Some(reserves) => {
                if reserves.len() != hops.len() {
                    return Err(DexError::validation(format!(
                        "route has {} hops but {} reserve pairs were supplied",
                        hops.len(),
                        reserves.len()
                    )));
                }
                (reserves.clone(), "caller")
            }
            None => {
                warn!(
                    hops = hops.len(),
                    "No live reserves supplied; quoting from seed amounts"
                );
                let seeds = hops
                    .iter()
                    .map(|(pool, token_in)| {
                        pool.seed_reserves_for(*token_in).ok_or_else(|| {
                            DexError::state(format!("pool {} does not hold {token_in}", pool.id))
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                (seeds, "seed")
            }
        };

        let expected_out = routed_swap_output(&reserves, request.amount_in, ctx.config.fee_bps)?;
        let amount_out_min = minimum_amount(expected_out, slippage)?;
        let price_impact = price_impact_percent(request.amount_in, reserves[0].reserve_in)?;

        let leg = SwapLeg {
            token_in: request.token_in,
            token_out: request.token_out,
            amount_in: request.amount_in,
            amount_out_min,
            recipient: request.recipient,
        };
        let plan = planner.swap(route, &leg)?;
        let steps = ctx.builder.build(&plan)?;

        info!(
            route = route.as_str(),
            amount_in = %request.amount_in,
            expected_out = %expected_out,
            amount_out_min = %amount_out_min,
            reserve_source,
            "Prepared swap"
        );

        let metadata = Metadata::new()
            .with("route", route.as_str())
            .with("token_in", request.token_in)
            .with("token_out", request.token_out)
            .with("amount_in", request.amount_in)
            .with("expected_amount_out", expected_out)
            .with("amount_out_min", amount_out_min)
            .with("price_impact_pct", price_impact.to_decimal())
            .with("slippage_pct", slippage.value())
            .with("fee_bps", i64::from(ctx.config.fee_bps))
            .with("reserve_source", reserve_source)
            .with("router", plan.router)
            .with("deadline", plan.deadline);

        Ok(PreparedPlan::new(steps, metadata))
    }
}

/// Confirmed pool of every hop, each with the token entering it.
async fn hop_pools(
    ctx: &CommandContext<'_>,
    planner: &RoutePlanner,
    route: PairRoute,
    request: &SwapRequest,
    direct: Option<Pool>,
) -> Result<Vec<(Pool, Address)>> {
    let token_in = pool_token(planner, request.token_in);
    match (route, direct) {
        (PairRoute::RoutedViaWrappedNative { wrapped_native }, _) => {
            let first = ctx
                .require_pool(planner, request.token_in, wrapped_native)
                .await?;
            let second = ctx
                .require_pool(planner, wrapped_native, request.token_out)
                .await?;
            Ok(vec![(first, token_in), (second, wrapped_native)])
        }
        (_, Some(pool)) => Ok(vec![(pool, token_in)]),
        (_, None) => Err(DexError::not_found(
            "pool",
            format!("{}/{}", request.token_in, request.token_out),
        )),
    }
}
