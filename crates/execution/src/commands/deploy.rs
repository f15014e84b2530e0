use super::{Command, CommandContext, PreparedPlan};
use crate::encoder::AbiValue;
use async_trait::async_trait;
use dexflow_domain::error::Result;
use dexflow_domain::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Template name of the ERC-20 token contract.
pub const DEFAULT_TOKEN_TEMPLATE: &str = "ERC20Token";
/// Template name of the pair factory contract.
pub const DEFAULT_FACTORY_TEMPLATE: &str = "UniswapV2Factory";
/// Template name of the swap router contract.
pub const DEFAULT_ROUTER_TEMPLATE: &str = "UniswapV2Router02";

/// Deploy a fixed-supply ERC-20 token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployTokenRequest {
    pub name: String,
    pub symbol: String,
    /// Supply minted to the deployer, in base units.
    pub initial_supply: TokenAmount,
    /// Template override; defaults to [`DEFAULT_TOKEN_TEMPLATE`].
    #[serde(default)]
    pub template: Option<String>,
}

/// Deploy the pair factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployFactoryRequest {
    /// Account allowed to set the protocol fee receiver.
    pub fee_to_setter: Address,
    #[serde(default)]
    pub template: Option<String>,
}

/// Deploy the router against the chain's registered factory and wrapped native token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployRouterRequest {
    #[serde(default)]
    pub template: Option<String>,
}

pub struct DeployTokenCommand;

#[async_trait]
impl Command for DeployTokenCommand {
    type Request = DeployTokenRequest;

    const KIND: OperationKind = OperationKind::DeployToken;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &DeployTokenRequest,
    ) -> Result<PreparedPlan> {
        let name = request.name.trim();
        let symbol = request.symbol.trim();
        if name.is_empty() || symbol.is_empty() {
            return Err(DexError::validation("token name and symbol are required"));
        }
        if request.initial_supply.is_zero() {
            return Err(DexError::validation("initial supply must be positive"));
        }

        let template = template_name(&request.template, DEFAULT_TOKEN_TEMPLATE);
        let artifact = ctx.artifacts.artifact(template).await?;
        let step = ctx.builder.deployment(
            TransactionType::TokenDeployment,
            &artifact,
            &[
                ("name", AbiValue::String(name.to_string())),
                ("symbol", AbiValue::String(symbol.to_string())),
                ("initialSupply", AbiValue::Uint(request.initial_supply)),
            ],
        )?;

        info!(template, symbol, "Prepared token deployment");

        let metadata = Metadata::new()
            .with("template", template)
            .with("name", name)
            .with("symbol", symbol)
            .with("initial_supply", request.initial_supply);
        Ok(PreparedPlan::new(vec![step], metadata))
    }
}

pub struct DeployFactoryCommand;

#[async_trait]
impl Command for DeployFactoryCommand {
    type Request = DeployFactoryRequest;

    const KIND: OperationKind = OperationKind::DeployFactory;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &DeployFactoryRequest,
    ) -> Result<PreparedPlan> {
        let template = template_name(&request.template, DEFAULT_FACTORY_TEMPLATE);
        let artifact = ctx.artifacts.artifact(template).await?;
        let step = ctx.builder.deployment(
            TransactionType::FactoryDeployment,
            &artifact,
            &[("feeToSetter", AbiValue::Address(request.fee_to_setter))],
        )?;

        info!(template, fee_to_setter = %request.fee_to_setter, "Prepared factory deployment");

        let metadata = Metadata::new()
            .with("template", template)
            .with("fee_to_setter", request.fee_to_setter);
        Ok(PreparedPlan::new(vec![step], metadata))
    }
}

pub struct DeployRouterCommand;

#[async_trait]
impl Command for DeployRouterCommand {
    type Request = DeployRouterRequest;

    const KIND: OperationKind = OperationKind::DeployRouter;

    async fn prepare(
        &self,
        ctx: &CommandContext<'_>,
        request: &DeployRouterRequest,
    ) -> Result<PreparedPlan> {
        let deployment = ctx.deployment().await?;
        let factory = deployment.require_factory()?;
        let wrapped_native = deployment.require_wrapped_native()?;

        let template = template_name(&request.template, DEFAULT_ROUTER_TEMPLATE);
        let artifact = ctx.artifacts.artifact(template).await?;
        let step = ctx.builder.deployment(
            TransactionType::RouterDeployment,
            &artifact,
            &[
                ("factory", AbiValue::Address(factory)),
                ("WETH", AbiValue::Address(wrapped_native)),
            ],
        )?;

        info!(template, factory = %factory, "Prepared router deployment");

        let metadata = Metadata::new()
            .with("template", template)
            .with("factory", factory)
            .with("wrapped_native", wrapped_native);
        Ok(PreparedPlan::new(vec![step], metadata))
    }
}

fn template_name<'a>(requested: &'a Option<String>, default: &'a str) -> &'a str {
    requested
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::*;

    const TOKEN_ABI: &str = r#"[{"type":"constructor","inputs":[
        {"name":"name_","type":"string"},
        {"name":"symbol_","type":"string"},
        {"name":"initialSupply","type":"uint256"}]}]"#;
    const ROUTER_CTOR_ABI: &str = r#"[{"type":"constructor","inputs":[
        {"name":"_factory","type":"address"},
        {"name":"_WETH","type":"address"}]}]"#;

    async fn with_artifact(harness: &Harness, name: &str, abi: &str) {
        harness
            .store
            .add_artifact(ContractArtifact {
                name: name.into(),
                abi: abi.into(),
                bytecode: "0x60806040".into(),
            })
            .await;
    }

    #[tokio::test]
    async fn test_deploy_token() {
        let harness = Harness::new().await;
        with_artifact(&harness, DEFAULT_TOKEN_TEMPLATE, TOKEN_ABI).await;

        let plan = DeployTokenCommand
            .prepare(
                &harness.ctx(),
                &DeployTokenRequest {
                    name: "Test Token".into(),
                    symbol: "TST".into(),
                    initial_supply: ether(1_000_000),
                    template: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(plan.steps.len(), 1);
        let step = &plan.steps[0];
        assert_eq!(step.transaction_type(), TransactionType::TokenDeployment);
        assert!(step.receiver().is_none());
        assert!(step.data().starts_with("0x60806040"));
        assert_eq!(step.raw_args()[1].value, "TST");
    }

    #[tokio::test]
    async fn test_deploy_token_missing_template_is_external() {
        let harness = Harness::new().await;
        let err = DeployTokenCommand
            .prepare(
                &harness.ctx(),
                &DeployTokenRequest {
                    name: "Test Token".into(),
                    symbol: "TST".into(),
                    initial_supply: ether(1),
                    template: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::External(_)));
    }

    #[tokio::test]
    async fn test_deploy_router_uses_registry_addresses() {
        let harness = Harness::new().await;
        with_artifact(&harness, DEFAULT_ROUTER_TEMPLATE, ROUTER_CTOR_ABI).await;

        let plan = DeployRouterCommand
            .prepare(&harness.ctx(), &DeployRouterRequest::default())
            .await
            .unwrap();
        let step = &plan.steps[0];
        assert_eq!(step.transaction_type(), TransactionType::RouterDeployment);
        assert_eq!(step.raw_args()[0].value, FACTORY.to_string());
        assert_eq!(step.raw_args()[1].value, WETH.to_string());
    }

    #[tokio::test]
    async fn test_deploy_router_without_factory_is_state_error() {
        let harness = Harness::new().await;
        with_artifact(&harness, DEFAULT_ROUTER_TEMPLATE, ROUTER_CTOR_ABI).await;
        harness
            .store
            .add_deployment(DeploymentRegistryEntry {
                chain_id: harness.chain.id,
                factory_address: None,
                router_address: None,
                wrapped_native_address: Some(WETH),
                version: "v2".into(),
            })
            .await;

        let err = DeployRouterCommand
            .prepare(&harness.ctx(), &DeployRouterRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DexError::State(_)));
    }

    #[test]
    fn test_template_name_fallback() {
        assert_eq!(template_name(&None, "A"), "A");
        assert_eq!(template_name(&Some("  ".into()), "A"), "A");
        assert_eq!(template_name(&Some("B".into()), "A"), "B");
    }
}
