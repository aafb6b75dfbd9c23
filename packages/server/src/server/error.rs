//! Mapping from catalog outcomes to HTTP responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domains::catalog::CatalogError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Error returned by route handlers.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(error: CatalogError) -> Self {
        Self(error)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(CatalogError::invalid(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            CatalogError::NoBaseCollection { .. } => (StatusCode::NOT_FOUND, self.0.to_string()),
            CatalogError::InvalidRequest { .. } => (StatusCode::BAD_REQUEST, self.0.to_string()),
            CatalogError::Unexpected(e) => {
                tracing::error!(error = ?e, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
