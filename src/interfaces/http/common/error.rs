//! Mapping of domain errors onto HTTP responses

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::ApiResponse;
use crate::domain::DomainError;

/// Handler error: a `DomainError` rendered as an `ApiResponse` envelope.
///
/// | error | status |
/// |---|---|
/// | `InvalidArgument` | 400 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `Unavailable` | 503 + `Retry-After` |
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DomainError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let body = ApiResponse::<()>::error(self.0.to_string()).with_code(self.0.code());
        if self.0.is_retryable() {
            (status, [(header::RETRY_AFTER, "1")], Json(body)).into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}
