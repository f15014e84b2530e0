//! Bundled ABIs for the contracts the planner calls.

/// ERC-20 subset: `approve` and `allowance`.
pub const ERC20_ABI: &str = include_str!("../../abi/erc20.json");

/// Uniswap V2 style router liquidity and swap functions.
pub const ROUTER_ABI: &str = include_str!("../../abi/uniswap_v2_router.json");
