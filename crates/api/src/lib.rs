//! REST API server and endpoints.
//!
//! This crate exposes the orchestration engine over HTTP:
//! - Operation submission returning a signing session
//! - Session read model consumed by the signing front end
//! - Health reporting for the active chain

/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Application state.
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiServer, ServerConfig};
pub use state::AppState;
