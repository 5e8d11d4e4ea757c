use crate::database::StoreError;
use crate::validation::ValidationError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Stored record could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "detail": err.errors })),
            )
                .into_response(),
            ApiError::Store(err @ StoreError::Conflict(_)) => {
                warn!(%err, "rejected duplicate form");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "detail": err.to_string() })),
                )
                    .into_response()
            }
            other => {
                error!(err = %other, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
