//! Turns logical steps into signable [`TransactionStep`]s.

use crate::encoder::{AbiValue, CallEncoder, ERC20_ABI, ROUTER_ABI};
use crate::planner::{ApprovedAsset, LogicalStep, RoutePlan};
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Builds transaction steps by resolving receivers, values and calldata.
#[derive(Clone)]
pub struct PlanBuilder {
    encoder: Arc<dyn CallEncoder>,
}

impl PlanBuilder {
    /// Creates a builder on top of a calldata encoder.
    pub fn new(encoder: Arc<dyn CallEncoder>) -> Self {
        Self { encoder }
    }

    /// Builds one step per logical step, preserving order.
    pub fn build(&self, plan: &RoutePlan) -> Result<Vec<TransactionStep>> {
        plan.steps
            .iter()
            .map(|step| self.build_step(plan, step))
            .collect()
    }

    /// Contract-creation step: `bytecode ++ constructor(args)`, blank receiver.
    pub fn deployment(
        &self,
        transaction_type: TransactionType,
        artifact: &ContractArtifact,
        constructor_args: &[(&str, AbiValue)],
    ) -> Result<TransactionStep> {
        let values: Vec<AbiValue> = constructor_args.iter().map(|(_, v)| v.clone()).collect();
        let data = self
            .encoder
            .encode_deployment(&artifact.bytecode, &values, &artifact.abi)?;
        let (title, description) = match transaction_type {
            TransactionType::TokenDeployment => (
                "Deploy Token".to_string(),
                format!("Deploy the {} token contract", artifact.name),
            ),
            TransactionType::FactoryDeployment => (
                "Deploy Factory".to_string(),
                format!("Deploy the {} pair factory", artifact.name),
            ),
            TransactionType::RouterDeployment => (
                "Deploy Router".to_string(),
                format!("Deploy the {} swap router", artifact.name),
            ),
            other => {
                return Err(DexError::validation(format!(
                    "{other} is not a contract deployment"
                )));
            }
        };
        debug!(
            artifact = %artifact.name,
            transaction_type = %transaction_type,
            "Built deployment step"
        );
        TransactionStep::deployment(
            title,
            description,
            data,
            transaction_type,
            raw_args(constructor_args),
        )
    }

    fn build_step(&self, plan: &RoutePlan, step: &LogicalStep) -> Result<TransactionStep> {
        let recipient = AbiValue::Address(plan.recipient);
        let deadline = AbiValue::Uint(plan.deadline);

        let built = match step {
            LogicalStep::Approve {
                token,
                spender,
                amount,
                asset,
            } => {
                let args = [
                    ("spender", AbiValue::Address(*spender)),
                    ("amount", AbiValue::Uint(*amount)),
                ];
                let (title, subject) = match asset {
                    ApprovedAsset::Token => ("Approve Token for Router", "token"),
                    ApprovedAsset::PoolShare => ("Approve LP Token for Router", "LP token"),
                };
                let allowance = if *amount == TokenAmount::MAX {
                    "an unlimited amount".to_string()
                } else {
                    amount.to_string()
                };
                self.call(
                    title,
                    format!("Allow the router to spend {allowance} of {subject} {token}"),
                    *token,
                    TokenAmount::zero(),
                    ERC20_ABI,
                    "approve",
                    &args,
                    TransactionType::Regular,
                )?
            }
            LogicalStep::AddLiquidityNative {
                token,
                amount_token_desired,
                amount_native_desired,
                amount_token_min,
                amount_native_min,
                seeds_new_pool,
            } => {
                let args = [
                    ("token", AbiValue::Address(*token)),
                    ("amountTokenDesired", AbiValue::Uint(*amount_token_desired)),
                    ("amountTokenMin", AbiValue::Uint(*amount_token_min)),
                    ("amountETHMin", AbiValue::Uint(*amount_native_min)),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                let title = if *seeds_new_pool {
                    "Create Pool and Add Liquidity"
                } else {
                    "Add Liquidity"
                };
                self.call(
                    title,
                    format!(
                        "Deposit {amount_token_desired} of {token} and {amount_native_desired} wei of the native coin"
                    ),
                    plan.router,
                    *amount_native_desired,
                    ROUTER_ABI,
                    "addLiquidityETH",
                    &args,
                    TransactionType::LiquidityAdd,
                )?
            }
            LogicalStep::AddLiquidity {
                token_a,
                token_b,
                amount_a_desired,
                amount_b_desired,
                amount_a_min,
                amount_b_min,
                seeds_new_pool,
            } => {
                let args = [
                    ("tokenA", AbiValue::Address(*token_a)),
                    ("tokenB", AbiValue::Address(*token_b)),
                    ("amountADesired", AbiValue::Uint(*amount_a_desired)),
                    ("amountBDesired", AbiValue::Uint(*amount_b_desired)),
                    ("amountAMin", AbiValue::Uint(*amount_a_min)),
                    ("amountBMin", AbiValue::Uint(*amount_b_min)),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                let title = if *seeds_new_pool {
                    "Create Pool and Add Liquidity"
                } else {
                    "Add Liquidity"
                };
                self.call(
                    title,
                    format!(
                        "Deposit {amount_a_desired} of {token_a} and {amount_b_desired} of {token_b}"
                    ),
                    plan.router,
                    TokenAmount::zero(),
                    ROUTER_ABI,
                    "addLiquidity",
                    &args,
                    TransactionType::LiquidityAdd,
                )?
            }
            LogicalStep::RemoveLiquidityNative {
                token,
                liquidity,
                amount_token_min,
                amount_native_min,
            } => {
                let args = [
                    ("token", AbiValue::Address(*token)),
                    ("liquidity", AbiValue::Uint(*liquidity)),
                    ("amountTokenMin", AbiValue::Uint(*amount_token_min)),
                    ("amountETHMin", AbiValue::Uint(*amount_native_min)),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                self.call(
                    "Remove Liquidity",
                    format!("Burn {liquidity} LP tokens for {token} and the native coin"),
                    plan.router,
                    TokenAmount::zero(),
                    ROUTER_ABI,
                    "removeLiquidityETH",
                    &args,
                    TransactionType::LiquidityRemove,
                )?
            }
            LogicalStep::RemoveLiquidity {
                token_a,
                token_b,
                liquidity,
                amount_a_min,
                amount_b_min,
            } => {
                let args = [
                    ("tokenA", AbiValue::Address(*token_a)),
                    ("tokenB", AbiValue::Address(*token_b)),
                    ("liquidity", AbiValue::Uint(*liquidity)),
                    ("amountAMin", AbiValue::Uint(*amount_a_min)),
                    ("amountBMin", AbiValue::Uint(*amount_b_min)),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                self.call(
                    "Remove Liquidity",
                    format!("Burn {liquidity} LP tokens for {token_a} and {token_b}"),
                    plan.router,
                    TokenAmount::zero(),
                    ROUTER_ABI,
                    "removeLiquidity",
                    &args,
                    TransactionType::LiquidityRemove,
                )?
            }
            LogicalStep::SwapExactNativeForTokens {
                amount_in,
                amount_out_min,
                path,
            } => {
                let args = [
                    ("amountOutMin", AbiValue::Uint(*amount_out_min)),
                    ("path", AbiValue::AddressArray(path.clone())),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                self.call(
                    "Swap Native for Tokens",
                    format!(
                        "Swap {amount_in} wei of the native coin for at least {amount_out_min} of {}",
                        last(path)
                    ),
                    plan.router,
                    *amount_in,
                    ROUTER_ABI,
                    "swapExactETHForTokens",
                    &args,
                    TransactionType::Swap,
                )?
            }
            LogicalStep::SwapExactTokensForNative {
                amount_in,
                amount_out_min,
                path,
            } => {
                let args = [
                    ("amountIn", AbiValue::Uint(*amount_in)),
                    ("amountOutMin", AbiValue::Uint(*amount_out_min)),
                    ("path", AbiValue::AddressArray(path.clone())),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                self.call(
                    "Swap Tokens for Native",
                    format!(
                        "Swap {amount_in} of {} for at least {amount_out_min} wei of the native coin",
                        first(path)
                    ),
                    plan.router,
                    TokenAmount::zero(),
                    ROUTER_ABI,
                    "swapExactTokensForETH",
                    &args,
                    TransactionType::Swap,
                )?
            }
            LogicalStep::SwapExactTokensForTokens {
                amount_in,
                amount_out_min,
                path,
            } => {
                let args = [
                    ("amountIn", AbiValue::Uint(*amount_in)),
                    ("amountOutMin", AbiValue::Uint(*amount_out_min)),
                    ("path", AbiValue::AddressArray(path.clone())),
                    ("to", recipient),
                    ("deadline", deadline),
                ];
                let via = if path.len() > 2 {
                    format!(" via {}", path[1])
                } else {
                    String::new()
                };
                self.call(
                    "Swap Tokens",
                    format!(
                        "Swap {amount_in} of {} for at least {amount_out_min} of {}{via}",
                        first(path),
                        last(path)
                    ),
                    plan.router,
                    TokenAmount::zero(),
                    ROUTER_ABI,
                    "swapExactTokensForTokens",
                    &args,
                    TransactionType::Swap,
                )?
            }
        };

        debug!(
            title = built.title(),
            receiver = ?built.receiver(),
            value = %built.value(),
            "Built transaction step"
        );
        Ok(built)
    }

    #[allow(clippy::too_many_arguments)]
    fn call(
        &self,
        title: &str,
        description: String,
        receiver: Address,
        value: TokenAmount,
        abi: &str,
        function: &str,
        args: &[(&str, AbiValue)],
        transaction_type: TransactionType,
    ) -> Result<TransactionStep> {
        let values: Vec<AbiValue> = args.iter().map(|(_, v)| v.clone()).collect();
        let data = self.encoder.encode_call(function, &values, abi)?;
        TransactionStep::call(
            title,
            description,
            receiver,
            value,
            data,
            transaction_type,
            raw_args(args),
        )
    }
}

fn raw_args(args: &[(&str, AbiValue)]) -> Vec<RawArgument> {
    args.iter()
        .map(|(name, value)| RawArgument::new(*name, value))
        .collect()
}

fn first(path: &[Address]) -> String {
    path.first().map(ToString::to_string).unwrap_or_default()
}

fn last(path: &[Address]) -> String {
    path.last().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::EthabiEncoder;
    use crate::planner::{AddLiquidityLeg, PairRoute, RoutePlanner, SwapLeg};
    use chrono::Utc;
    use uuid::Uuid;

    const ROUTER: Address = Address::from_bytes([0xd0; 20]);
    const WETH: Address = Address::from_bytes([0xee; 20]);
    const TOKEN: Address = Address::from_bytes([0x0a; 20]);
    const USER: Address = Address::from_bytes([0x01; 20]);

    fn builder() -> PlanBuilder {
        PlanBuilder::new(Arc::new(EthabiEncoder::new()))
    }

    fn planner() -> RoutePlanner {
        let deployment = DeploymentRegistryEntry {
            chain_id: Uuid::new_v4(),
            factory_address: Some(Address::from_bytes([0xfa; 20])),
            router_address: Some(ROUTER),
            wrapped_native_address: Some(WETH),
            version: "v2".into(),
        };
        RoutePlanner::new(&deployment, Utc::now(), 600).unwrap()
    }

    #[test]
    fn test_add_liquidity_native_steps() {
        let leg = AddLiquidityLeg {
            token_a: TOKEN,
            token_b: Address::NATIVE,
            amount_a_desired: TokenAmount::from(1_000u64),
            amount_b_desired: TokenAmount::from(5u64),
            amount_a_min: TokenAmount::from(990u64),
            amount_b_min: TokenAmount::from(4u64),
            recipient: USER,
            seeds_new_pool: true,
        };
        let route = PairRoute::for_liquidity(leg.token_a, leg.token_b).unwrap();
        let plan = planner().add_liquidity(route, &leg).unwrap();
        let steps = builder().build(&plan).unwrap();

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].title(), "Approve Token for Router");
        assert_eq!(steps[0].receiver(), Some(TOKEN));
        assert_eq!(steps[0].selector(), Some("0x095ea7b3"));
        assert!(steps[0].description().contains("an unlimited amount"));
        assert_eq!(steps[0].transaction_type(), TransactionType::Regular);

        assert_eq!(steps[1].title(), "Create Pool and Add Liquidity");
        assert_eq!(steps[1].receiver(), Some(ROUTER));
        assert_eq!(steps[1].value(), TokenAmount::from(5u64));
        assert_eq!(steps[1].selector(), Some("0xf305d719"));
        assert_eq!(steps[1].transaction_type(), TransactionType::LiquidityAdd);
        assert_eq!(steps[1].raw_args()[0].name, "token");
        assert_eq!(steps[1].raw_args().len(), 6);
    }

    #[test]
    fn test_native_swap_carries_value() {
        let leg = SwapLeg {
            token_in: Address::NATIVE,
            token_out: TOKEN,
            amount_in: TokenAmount::from(77u64),
            amount_out_min: TokenAmount::from(70u64),
            recipient: USER,
        };
        let route = PairRoute::for_swap(leg.token_in, leg.token_out, false, WETH).unwrap();
        let plan = planner().swap(route, &leg).unwrap();
        let steps = builder().build(&plan).unwrap();

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].value(), TokenAmount::from(77u64));
        assert_eq!(steps[0].selector(), Some("0x7ff36ab5"));
        assert_eq!(steps[0].transaction_type(), TransactionType::Swap);
        let path = &steps[0].raw_args()[1];
        assert_eq!(path.name, "path");
        assert_eq!(path.value, format!("[{WETH}, {TOKEN}]"));
    }

    #[test]
    fn test_deployment_step() {
        let artifact = ContractArtifact {
            name: "UniswapV2Factory".into(),
            abi: r#"[{"type":"constructor","inputs":[{"name":"_feeToSetter","type":"address"}]}]"#
                .into(),
            bytecode: "0x6080".into(),
        };
        let step = builder()
            .deployment(
                TransactionType::FactoryDeployment,
                &artifact,
                &[("feeToSetter", AbiValue::Address(USER))],
            )
            .unwrap();

        assert_eq!(step.title(), "Deploy Factory");
        assert!(step.receiver().is_none());
        assert!(step.value().is_zero());
        assert!(step.data().starts_with("0x6080"));
        assert_eq!(step.raw_args()[0].value, USER.to_string());

        assert!(
            builder()
                .deployment(TransactionType::Swap, &artifact, &[])
                .is_err()
        );
    }
}
