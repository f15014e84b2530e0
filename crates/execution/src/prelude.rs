//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types from the crate.
//!
//! # Example
//!
//! ```rust
//! use dexflow_execution::prelude::*;
//! ```

// Builder
pub use crate::builder::PlanBuilder;

// Commands
pub use crate::commands::{
    AddLiquidityRequest, Command, CommandContext, CreatePoolRequest, DeployFactoryRequest,
    DeployRouterRequest, DeployTokenRequest, Operation, Orchestrator, PairReserves, Ports,
    PreparedPlan, RemoveLiquidityRequest, SessionTicket, SwapRequest,
};

// Config
pub use crate::config::{DEFAULT_DEADLINE_SECS, PlannerConfig};

// Encoder
pub use crate::encoder::{AbiValue, CallEncoder, ERC20_ABI, EthabiEncoder, ROUTER_ABI};

// Planner
pub use crate::planner::{
    AddLiquidityLeg, ApprovedAsset, LogicalStep, PairRoute, RemoveLiquidityLeg, RoutePlan,
    RoutePlanner, SwapLeg,
};

// Session
pub use crate::session::SessionManager;

// Store
pub use crate::store::{Fixture, InMemoryStore};
