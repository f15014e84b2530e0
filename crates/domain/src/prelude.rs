//! Prelude module for convenient imports.
//!
//! ```rust
//! use dexflow_domain::prelude::*;
//! ```

pub use crate::entities::{
    Chain, ContractArtifact, DeploymentRegistryEntry, LiquidityPosition, Pool, PositionId,
    RawArgument, SessionId, TransactionSession, TransactionStep,
};
pub use crate::enums::{
    ChainType, ConfirmationStatus, LiquidityAction, OperationKind, TransactionType,
};
pub use crate::error::DexError;
pub use crate::metadata::{Metadata, MetadataEntry, MetadataValue};
pub use crate::ports::{
    ArtifactSource, ChainRegistry, DeploymentRegistry, LiquidityStore, PoolStore, SessionStore,
};
pub use crate::token::{NATIVE_DECIMALS, TokenAmount};
pub use crate::value_objects::{Address, HopReserves, InitialPrice, Percentage, PriceImpact};
