//! Transaction planning and session orchestration.
//!
//! This crate turns requested DEX operations into signable sessions:
//! - Calldata encoding against bundled router and ERC-20 ABIs
//! - Route planning (direct, native-paired and routed pairs)
//! - Transaction step building with slippage-protected minimums
//! - Typed commands for pools, liquidity, swaps and contract deployments
//! - Session creation and lookup
//! - In-memory stores for tests and local runs

/// Prelude module for convenient imports.
pub mod prelude;

/// Transaction step building.
pub mod builder;
/// Typed operations and their commands.
pub mod commands;
/// Planner configuration.
pub mod config;
/// Calldata encoding.
pub mod encoder;
/// Route planning.
pub mod planner;
/// Session management.
pub mod session;
/// In-memory stores.
pub mod store;
