//! HTTP mapping of engine failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use dexflow_domain::prelude::DexError;
use tracing::{error, warn};

/// Errors returned by API handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Failure reported by the engine.
    #[error(transparent)]
    Engine(#[from] DexError),
    /// Malformed path or query parameter.
    #[error("{0}")]
    BadRequest(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Engine(DexError::Validation(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Engine(DexError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Engine(DexError::State(_)) => StatusCode::CONFLICT,
            Self::Engine(DexError::Arithmetic(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Engine(DexError::External(_)) => StatusCode::BAD_GATEWAY,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Engine(err) => err.kind(),
            Self::BadRequest(_) => "validation",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "code": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DexError::validation("x"), StatusCode::BAD_REQUEST),
            (DexError::not_found("pool", "a/b"), StatusCode::NOT_FOUND),
            (DexError::state("pending"), StatusCode::CONFLICT),
            (DexError::arithmetic("overflow"), StatusCode::UNPROCESSABLE_ENTITY),
            (DexError::external("rpc"), StatusCode::BAD_GATEWAY),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
        assert_eq!(
            ApiError::BadRequest("id".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
