pub mod artifact;
pub mod chain;
pub mod deployment;
pub mod pool;
pub mod position;
pub mod session;
pub mod transaction;

// Re-export for easier access
pub use artifact::ContractArtifact;
pub use chain::Chain;
pub use deployment::DeploymentRegistryEntry;
pub use pool::Pool;
pub use position::{LiquidityPosition, PositionId};
pub use session::{SessionId, TransactionSession};
pub use transaction::{RawArgument, TransactionStep};
