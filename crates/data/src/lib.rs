//! PostgreSQL persistence and artifact loading.
//!
//! This crate provides the production implementations of the store ports:
//! - Chain and deployment registries
//! - Pool, liquidity position and session repositories
//! - Contract templates read from compiled artifact files

/// Contract artifacts on disk.
pub mod artifacts;
/// Storage error mapping.
pub mod error;
/// Repository implementations.
pub mod repositories;

pub use artifacts::FileArtifactSource;
pub use repositories::Database;
