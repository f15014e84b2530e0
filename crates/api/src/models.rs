//! API request/response models.

use dexflow_domain::prelude::*;
use dexflow_execution::prelude::Operation;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /operations`: the tagged operation plus an optional chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    #[serde(flatten)]
    pub operation: Operation,
    /// Target chain; the registry's active chain when omitted.
    #[serde(default)]
    pub chain_id: Option<Uuid>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when no chain is active.
    pub status: String,
    pub version: String,
    /// Name of the active chain.
    pub active_chain: Option<String>,
}

/// A stored session with the URL where it can be signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: TransactionSession,
    pub signing_url: String,
}
