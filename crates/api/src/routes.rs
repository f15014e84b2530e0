//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the `/api/v1` router.
pub fn create_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/operations", post(handlers::create_operation));

    Router::new()
        .nest("/api/v1", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
