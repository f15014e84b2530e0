//! Domain model for the DEX transaction orchestration engine.
//!
//! This crate holds everything that does not perform I/O:
//! - Constant-product quote math on wei-scale integers
//! - Pools, liquidity positions, deployment registry entries and chains
//! - Transaction steps and signable sessions
//! - The error taxonomy shared by every layer
//! - Store and registry ports implemented by the execution and data crates

/// Prelude module for convenient imports.
pub mod prelude;

/// Domain entities.
pub mod entities;
/// Shared enumerations.
pub mod enums;
/// Error taxonomy.
pub mod error;
/// AMM math.
pub mod math;
/// Typed session metadata.
pub mod metadata;
/// Ports to external collaborators.
pub mod ports;
/// Token amounts and unit conversion.
pub mod token;
/// Value objects.
pub mod value_objects;
