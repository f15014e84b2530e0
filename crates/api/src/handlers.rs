//! Request handlers.

use crate::error::ApiError;
use crate::models::{HealthResponse, OperationRequest, SessionResponse};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use dexflow_domain::prelude::*;
use dexflow_execution::prelude::SessionTicket;
use tracing::{debug, info};

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_chain = state
        .orchestrator
        .resolve_chain(None)
        .await
        .map(|chain| chain.name)
        .ok();
    let status = if active_chain.is_some() { "ok" } else { "degraded" };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_chain,
    })
}

/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let id: SessionId = id
        .parse()
        .map_err(|e: DexError| ApiError::BadRequest(e.to_string()))?;
    let sessions = state.orchestrator.sessions();
    let session = sessions.get_session(id).await?;
    debug!(session_id = %id, steps = session.steps.len(), "Session served");
    Ok(Json(SessionResponse {
        signing_url: sessions.signing_url(id),
        session,
    }))
}

/// `POST /operations`
pub async fn create_operation(
    State(state): State<AppState>,
    Json(request): Json<OperationRequest>,
) -> Result<(StatusCode, Json<SessionTicket>), ApiError> {
    let kind = request.operation.kind();
    let ticket = state
        .orchestrator
        .execute(request.operation, request.chain_id)
        .await?;
    info!(operation = %kind, session_id = %ticket.session_id, "Session created via API");
    Ok((StatusCode::CREATED, Json(ticket)))
}
