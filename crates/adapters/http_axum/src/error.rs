//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use zonefare_domain::error::ZonefareError;

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`ZonefareError`] to an HTTP response with appropriate status code.
pub struct ApiError(ZonefareError);

impl From<ZonefareError> for ApiError {
    fn from(err: ZonefareError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn internal(err: &ZonefareError) -> (StatusCode, String) {
        tracing::error!(error = %err, details = ?err, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ZonefareError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ZonefareError::NotFound(err) => (StatusCode::NOT_FOUND, err.to_string()),
            ZonefareError::Conflict(err) => (StatusCode::CONFLICT, err.to_string()),
            ZonefareError::Geometry(err) => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
            ZonefareError::DataCorruption(_)
            | ZonefareError::ContractViolation(_)
            | ZonefareError::Storage(_) => Self::internal(&self.0),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
