//! Route planning: which on-chain calls realize an operation, and in what order.
//!
//! The planner works on addresses and amounts only. Calldata, titles and
//! receivers are resolved later by the [`PlanBuilder`](crate::builder::PlanBuilder).

use chrono::{DateTime, Utc};
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};

/// How a token pair is reached through the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PairRoute {
    /// Exactly one side is the native coin; `token` is the other side.
    DirectNativePair { token: Address },
    /// Two ERC-20 tokens sharing a pool.
    DirectTokenPair,
    /// Two ERC-20 tokens without a shared pool, swapped through the wrapped native token.
    RoutedViaWrappedNative { wrapped_native: Address },
}

impl PairRoute {
    /// Route for adding or removing liquidity; there is no routed variant.
    pub fn for_liquidity(token_a: Address, token_b: Address) -> Result<Self> {
        ensure_distinct(token_a, token_b)?;
        Ok(match (token_a.is_native(), token_b.is_native()) {
            (true, _) => Self::DirectNativePair { token: token_b },
            (_, true) => Self::DirectNativePair { token: token_a },
            _ => Self::DirectTokenPair,
        })
    }

    /// Route for a swap. Token pairs without a direct pool go through `wrapped_native`.
    pub fn for_swap(
        token_in: Address,
        token_out: Address,
        has_direct_pool: bool,
        wrapped_native: Address,
    ) -> Result<Self> {
        let route = Self::for_liquidity(token_in, token_out)?;
        if route != Self::DirectTokenPair || has_direct_pool {
            return Ok(route);
        }
        if token_in == wrapped_native || token_out == wrapped_native {
            return Err(DexError::not_found("pool", format!("{token_in}/{token_out}")));
        }
        Ok(Self::RoutedViaWrappedNative { wrapped_native })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectNativePair { .. } => "direct_native_pair",
            Self::DirectTokenPair => "direct_token_pair",
            Self::RoutedViaWrappedNative { .. } => "routed_via_wrapped_native",
        }
    }
}

fn ensure_distinct(token_a: Address, token_b: Address) -> Result<()> {
    if token_a == token_b {
        let what = if token_a.is_native() {
            "both sides are the native coin".to_string()
        } else {
            format!("both sides are {token_a}")
        };
        return Err(DexError::validation(format!(
            "a pair needs two different tokens, {what}"
        )));
    }
    Ok(())
}

/// What an approval unlocks for the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovedAsset {
    Token,
    PoolShare,
}

/// One call in a route plan, before encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalStep {
    Approve {
        token: Address,
        spender: Address,
        amount: TokenAmount,
        asset: ApprovedAsset,
    },
    AddLiquidityNative {
        token: Address,
        amount_token_desired: TokenAmount,
        amount_native_desired: TokenAmount,
        amount_token_min: TokenAmount,
        amount_native_min: TokenAmount,
        seeds_new_pool: bool,
    },
    AddLiquidity {
        token_a: Address,
        token_b: Address,
        amount_a_desired: TokenAmount,
        amount_b_desired: TokenAmount,
        amount_a_min: TokenAmount,
        amount_b_min: TokenAmount,
        seeds_new_pool: bool,
    },
    RemoveLiquidityNative {
        token: Address,
        liquidity: TokenAmount,
        amount_token_min: TokenAmount,
        amount_native_min: TokenAmount,
    },
    RemoveLiquidity {
        token_a: Address,
        token_b: Address,
        liquidity: TokenAmount,
        amount_a_min: TokenAmount,
        amount_b_min: TokenAmount,
    },
    SwapExactNativeForTokens {
        amount_in: TokenAmount,
        amount_out_min: TokenAmount,
        path: Vec<Address>,
    },
    SwapExactTokensForNative {
        amount_in: TokenAmount,
        amount_out_min: TokenAmount,
        path: Vec<Address>,
    },
    SwapExactTokensForTokens {
        amount_in: TokenAmount,
        amount_out_min: TokenAmount,
        path: Vec<Address>,
    },
}

impl LogicalStep {
    #[must_use]
    pub fn is_approval(&self) -> bool {
        matches!(self, Self::Approve { .. })
    }
}

/// Ordered logical steps for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePlan {
    pub route: PairRoute,
    pub router: Address,
    pub recipient: Address,
    /// Unix timestamp after which router calls revert.
    pub deadline: TokenAmount,
    pub steps: Vec<LogicalStep>,
}

/// Amounts for a liquidity add. Side `a`/`b` follow the caller's token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddLiquidityLeg {
    pub token_a: Address,
    pub token_b: Address,
    pub amount_a_desired: TokenAmount,
    pub amount_b_desired: TokenAmount,
    pub amount_a_min: TokenAmount,
    pub amount_b_min: TokenAmount,
    pub recipient: Address,
    /// The add creates the pair on the router's first deposit.
    pub seeds_new_pool: bool,
}

/// Amounts for a liquidity removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveLiquidityLeg {
    pub token_a: Address,
    pub token_b: Address,
    /// LP token of the pool.
    pub pair: Address,
    pub liquidity: TokenAmount,
    pub amount_a_min: TokenAmount,
    pub amount_b_min: TokenAmount,
    pub recipient: Address,
}

/// Amounts for an exact-input swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapLeg {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: TokenAmount,
    pub amount_out_min: TokenAmount,
    pub recipient: Address,
}

/// Turns classified pairs into ordered logical steps against one router deployment.
#[derive(Debug, Clone)]
pub struct RoutePlanner {
    router: Address,
    factory: Address,
    wrapped_native: Address,
    deadline: TokenAmount,
}

impl RoutePlanner {
    /// Creates a planner for a chain's deployment.
    ///
    /// Fails with a state error when the router, factory or wrapped native
    /// token is not provisioned.
    pub fn new(
        deployment: &DeploymentRegistryEntry,
        now: DateTime<Utc>,
        deadline_secs: u64,
    ) -> Result<Self> {
        let router = deployment.require_router()?;
        let factory = deployment.require_factory()?;
        let wrapped_native = deployment.require_wrapped_native()?;
        let now_secs = u64::try_from(now.timestamp())
            .map_err(|_| DexError::validation(format!("clock before unix epoch: {now}")))?;
        let deadline = now_secs
            .checked_add(deadline_secs)
            .ok_or_else(|| DexError::arithmetic("deadline overflowed"))?;

        Ok(Self {
            router,
            factory,
            wrapped_native,
            deadline: TokenAmount::from(deadline),
        })
    }

    pub fn router(&self) -> Address {
        self.router
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    pub fn wrapped_native(&self) -> Address {
        self.wrapped_native
    }

    pub fn deadline(&self) -> TokenAmount {
        self.deadline
    }

    /// Approvals for every ERC-20 side, then the router deposit.
    pub fn add_liquidity(&self, route: PairRoute, leg: &AddLiquidityLeg) -> Result<RoutePlan> {
        let steps = match route {
            PairRoute::DirectNativePair { token } => {
                let token_is_a = token == leg.token_a;
                let (token_desired, native_desired, token_min, native_min) = if token_is_a {
                    (
                        leg.amount_a_desired,
                        leg.amount_b_desired,
                        leg.amount_a_min,
                        leg.amount_b_min,
                    )
                } else {
                    (
                        leg.amount_b_desired,
                        leg.amount_a_desired,
                        leg.amount_b_min,
                        leg.amount_a_min,
                    )
                };
                vec![
                    self.unlimited_approval(token),
                    LogicalStep::AddLiquidityNative {
                        token,
                        amount_token_desired: token_desired,
                        amount_native_desired: native_desired,
                        amount_token_min: token_min,
                        amount_native_min: native_min,
                        seeds_new_pool: leg.seeds_new_pool,
                    },
                ]
            }
            PairRoute::DirectTokenPair => vec![
                self.unlimited_approval(leg.token_a),
                self.unlimited_approval(leg.token_b),
                LogicalStep::AddLiquidity {
                    token_a: leg.token_a,
                    token_b: leg.token_b,
                    amount_a_desired: leg.amount_a_desired,
                    amount_b_desired: leg.amount_b_desired,
                    amount_a_min: leg.amount_a_min,
                    amount_b_min: leg.amount_b_min,
                    seeds_new_pool: leg.seeds_new_pool,
                },
            ],
            PairRoute::RoutedViaWrappedNative { .. } => {
                return Err(DexError::validation(
                    "liquidity can only be added to a direct pool",
                ));
            }
        };
        Ok(self.plan(route, leg.recipient, steps))
    }

    /// Approval of exactly the LP tokens to burn, then the router withdrawal.
    pub fn remove_liquidity(&self, route: PairRoute, leg: &RemoveLiquidityLeg) -> Result<RoutePlan> {
        if leg.liquidity.is_zero() {
            return Err(DexError::validation("liquidity to remove must be positive"));
        }
        let approve = LogicalStep::Approve {
            token: leg.pair,
            spender: self.router,
            amount: leg.liquidity,
            asset: ApprovedAsset::PoolShare,
        };
        let withdraw = match route {
            PairRoute::DirectNativePair { token } => {
                let (token_min, native_min) = if token == leg.token_a {
                    (leg.amount_a_min, leg.amount_b_min)
                } else {
                    (leg.amount_b_min, leg.amount_a_min)
                };
                LogicalStep::RemoveLiquidityNative {
                    token,
                    liquidity: leg.liquidity,
                    amount_token_min: token_min,
                    amount_native_min: native_min,
                }
            }
            PairRoute::DirectTokenPair => LogicalStep::RemoveLiquidity {
                token_a: leg.token_a,
                token_b: leg.token_b,
                liquidity: leg.liquidity,
                amount_a_min: leg.amount_a_min,
                amount_b_min: leg.amount_b_min,
            },
            PairRoute::RoutedViaWrappedNative { .. } => {
                return Err(DexError::validation(
                    "liquidity can only be removed from a direct pool",
                ));
            }
        };
        Ok(self.plan(route, leg.recipient, vec![approve, withdraw]))
    }

    /// Native input needs no approval; every ERC-20 input is approved for exactly `amount_in`.
    pub fn swap(&self, route: PairRoute, leg: &SwapLeg) -> Result<RoutePlan> {
        if leg.amount_in.is_zero() {
            return Err(DexError::validation("swap amount must be positive"));
        }
        let approve_in = LogicalStep::Approve {
            token: leg.token_in,
            spender: self.router,
            amount: leg.amount_in,
            asset: ApprovedAsset::Token,
        };
        let steps = match route {
            PairRoute::DirectNativePair { token } if leg.token_in.is_native() => {
                vec![LogicalStep::SwapExactNativeForTokens {
                    amount_in: leg.amount_in,
                    amount_out_min: leg.amount_out_min,
                    path: vec![self.wrapped_native, token],
                }]
            }
            PairRoute::DirectNativePair { token } => vec![
                approve_in,
                LogicalStep::SwapExactTokensForNative {
                    amount_in: leg.amount_in,
                    amount_out_min: leg.amount_out_min,
                    path: vec![token, self.wrapped_native],
                },
            ],
            PairRoute::DirectTokenPair => vec![
                approve_in,
                LogicalStep::SwapExactTokensForTokens {
                    amount_in: leg.amount_in,
                    amount_out_min: leg.amount_out_min,
                    path: vec![leg.token_in, leg.token_out],
                },
            ],
            PairRoute::RoutedViaWrappedNative { wrapped_native } => vec![
                approve_in,
                LogicalStep::SwapExactTokensForTokens {
                    amount_in: leg.amount_in,
                    amount_out_min: leg.amount_out_min,
                    path: vec![leg.token_in, wrapped_native, leg.token_out],
                },
            ],
        };
        Ok(self.plan(route, leg.recipient, steps))
    }

    fn unlimited_approval(&self, token: Address) -> LogicalStep {
        LogicalStep::Approve {
            token,
            spender: self.router,
            amount: TokenAmount::MAX,
            asset: ApprovedAsset::Token,
        }
    }

    fn plan(&self, route: PairRoute, recipient: Address, steps: Vec<LogicalStep>) -> RoutePlan {
        RoutePlan {
            route,
            router: self.router,
            recipient,
            deadline: self.deadline,
            steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    const ROUTER: Address = Address::from_bytes([0xd0; 20]);
    const FACTORY: Address = Address::from_bytes([0xfa; 20]);
    const WETH: Address = Address::from_bytes([0xee; 20]);
    const TOKEN_A: Address = Address::from_bytes([0x0a; 20]);
    const TOKEN_B: Address = Address::from_bytes([0x0b; 20]);
    const PAIR: Address = Address::from_bytes([0x99; 20]);
    const USER: Address = Address::from_bytes([0x01; 20]);

    fn deployment() -> DeploymentRegistryEntry {
        DeploymentRegistryEntry {
            chain_id: Uuid::new_v4(),
            factory_address: Some(FACTORY),
            router_address: Some(ROUTER),
            wrapped_native_address: Some(WETH),
            version: "v2".into(),
        }
    }

    fn planner() -> RoutePlanner {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        RoutePlanner::new(&deployment(), now, 600).unwrap()
    }

    fn add_leg(token_a: Address, token_b: Address) -> AddLiquidityLeg {
        AddLiquidityLeg {
            token_a,
            token_b,
            amount_a_desired: TokenAmount::from(1_000u64),
            amount_b_desired: TokenAmount::from(2_000u64),
            amount_a_min: TokenAmount::from(990u64),
            amount_b_min: TokenAmount::from(1_980u64),
            recipient: USER,
            seeds_new_pool: false,
        }
    }

    fn swap_leg(token_in: Address, token_out: Address) -> SwapLeg {
        SwapLeg {
            token_in,
            token_out,
            amount_in: TokenAmount::from(100u64),
            amount_out_min: TokenAmount::from(90u64),
            recipient: USER,
        }
    }

    #[test]
    fn test_classification() {
        assert_eq!(
            PairRoute::for_liquidity(Address::NATIVE, TOKEN_A).unwrap(),
            PairRoute::DirectNativePair { token: TOKEN_A }
        );
        assert_eq!(
            PairRoute::for_liquidity(TOKEN_A, TOKEN_B).unwrap(),
            PairRoute::DirectTokenPair
        );
        assert_eq!(
            PairRoute::for_swap(TOKEN_A, TOKEN_B, false, WETH).unwrap(),
            PairRoute::RoutedViaWrappedNative {
                wrapped_native: WETH
            }
        );
        assert_eq!(
            PairRoute::for_swap(TOKEN_A, TOKEN_B, true, WETH).unwrap(),
            PairRoute::DirectTokenPair
        );
    }

    #[test]
    fn test_identical_and_native_pairs_rejected() {
        assert!(matches!(
            PairRoute::for_liquidity(TOKEN_A, TOKEN_A),
            Err(DexError::Validation(_))
        ));
        assert!(matches!(
            PairRoute::for_swap(Address::NATIVE, Address::NATIVE, false, WETH),
            Err(DexError::Validation(_))
        ));
    }

    #[test]
    fn test_routing_through_wrapped_native_itself_is_not_found() {
        assert!(matches!(
            PairRoute::for_swap(WETH, TOKEN_B, false, WETH),
            Err(DexError::NotFound { .. })
        ));
    }

    #[test]
    fn test_missing_contracts_are_state_errors() {
        let mut entry = deployment();
        entry.router_address = None;
        assert!(matches!(
            RoutePlanner::new(&entry, Utc::now(), 600),
            Err(DexError::State(_))
        ));
    }

    #[test]
    fn test_deadline_is_now_plus_window() {
        assert_eq!(planner().deadline(), TokenAmount::from(1_704_067_800u64));
    }

    #[test]
    fn test_add_liquidity_native_pair() {
        let leg = add_leg(TOKEN_A, Address::NATIVE);
        let route = PairRoute::for_liquidity(leg.token_a, leg.token_b).unwrap();
        let plan = planner().add_liquidity(route, &leg).unwrap();

        assert_eq!(plan.steps.len(), 2);
        assert_eq!(
            plan.steps[0],
            LogicalStep::Approve {
                token: TOKEN_A,
                spender: ROUTER,
                amount: TokenAmount::MAX,
                asset: ApprovedAsset::Token,
            }
        );
        match &plan.steps[1] {
            LogicalStep::AddLiquidityNative {
                token,
                amount_native_desired,
                amount_token_min,
                ..
            } => {
                assert_eq!(*token, TOKEN_A);
                assert_eq!(*amount_native_desired, TokenAmount::from(2_000u64));
                assert_eq!(*amount_token_min, TokenAmount::from(990u64));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_add_liquidity_native_first() {
        let leg = add_leg(Address::NATIVE, TOKEN_B);
        let route = PairRoute::for_liquidity(leg.token_a, leg.token_b).unwrap();
        let plan = planner().add_liquidity(route, &leg).unwrap();
        match &plan.steps[1] {
            LogicalStep::AddLiquidityNative {
                token,
                amount_token_desired,
                amount_native_desired,
                ..
            } => {
                assert_eq!(*token, TOKEN_B);
                assert_eq!(*amount_token_desired, TokenAmount::from(2_000u64));
                assert_eq!(*amount_native_desired, TokenAmount::from(1_000u64));
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn test_add_liquidity_token_pair() {
        let leg = add_leg(TOKEN_A, TOKEN_B);
        let plan = planner()
            .add_liquidity(PairRoute::DirectTokenPair, &leg)
            .unwrap();
        assert_eq!(plan.steps.len(), 3);
        assert!(plan.steps[0].is_approval());
        assert!(plan.steps[1].is_approval());
        assert!(matches!(plan.steps[2], LogicalStep::AddLiquidity { .. }));
    }

    #[test]
    fn test_remove_liquidity_approves_exact_lp_amount() {
        let leg = RemoveLiquidityLeg {
            token_a: Address::NATIVE,
            token_b: TOKEN_B,
            pair: PAIR,
            liquidity: TokenAmount::from(500u64),
            amount_a_min: TokenAmount::from(10u64),
            amount_b_min: TokenAmount::from(20u64),
            recipient: USER,
        };
        let route = PairRoute::for_liquidity(leg.token_a, leg.token_b).unwrap();
        let plan = planner().remove_liquidity(route, &leg).unwrap();

        assert_eq!(
            plan.steps,
            vec![
                LogicalStep::Approve {
                    token: PAIR,
                    spender: ROUTER,
                    amount: TokenAmount::from(500u64),
                    asset: ApprovedAsset::PoolShare,
                },
                LogicalStep::RemoveLiquidityNative {
                    token: TOKEN_B,
                    liquidity: TokenAmount::from(500u64),
                    amount_token_min: TokenAmount::from(20u64),
                    amount_native_min: TokenAmount::from(10u64),
                },
            ]
        );
    }

    #[test]
    fn test_swap_step_counts_and_paths() {
        let planner = planner();

        let leg = swap_leg(Address::NATIVE, TOKEN_A);
        let route = PairRoute::for_swap(leg.token_in, leg.token_out, false, WETH).unwrap();
        let plan = planner.swap(route, &leg).unwrap();
        assert_eq!(plan.steps.len(), 1);
        assert!(matches!(
            &plan.steps[0],
            LogicalStep::SwapExactNativeForTokens { path, .. } if *path == vec![WETH, TOKEN_A]
        ));

        let leg = swap_leg(TOKEN_A, Address::NATIVE);
        let route = PairRoute::for_swap(leg.token_in, leg.token_out, false, WETH).unwrap();
        let plan = planner.swap(route, &leg).unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert!(matches!(
            &plan.steps[1],
            LogicalStep::SwapExactTokensForNative { path, .. } if *path == vec![TOKEN_A, WETH]
        ));

        let leg = swap_leg(TOKEN_A, TOKEN_B);
        let route = PairRoute::for_swap(leg.token_in, leg.token_out, false, WETH).unwrap();
        let plan = planner.swap(route, &leg).unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(
            plan.steps[0],
            LogicalStep::Approve {
                token: TOKEN_A,
                spender: ROUTER,
                amount: TokenAmount::from(100u64),
                asset: ApprovedAsset::Token,
            }
        );
        assert!(matches!(
            &plan.steps[1],
            LogicalStep::SwapExactTokensForTokens { path, .. } if *path == vec![TOKEN_A, WETH, TOKEN_B]
        ));
    }

    #[test]
    fn test_approvals_precede_consumers() {
        let planner = planner();
        let plans = [
            planner
                .add_liquidity(PairRoute::DirectTokenPair, &add_leg(TOKEN_A, TOKEN_B))
                .unwrap(),
            planner
                .swap(PairRoute::DirectTokenPair, &swap_leg(TOKEN_A, TOKEN_B))
                .unwrap(),
        ];
        for plan in plans {
            let first_action = plan
                .steps
                .iter()
                .position(|s| !s.is_approval())
                .unwrap();
            assert!(plan.steps[first_action..].iter().all(|s| !s.is_approval()));
        }
    }
}
