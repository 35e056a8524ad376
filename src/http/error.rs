use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::errors::Error;

/// Transport-layer wrapper turning [`Error`] into the structured failure
/// envelope.
pub struct ApiError(pub Error);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Unauthenticated | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            // Conceptually 409, but clients key on 401 for duplicate
            // registration. See DESIGN.md.
            Error::Conflict(_) => StatusCode::UNAUTHORIZED,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::Redis(_) | Error::Hash(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.0, "request failed");
            "something went wrong".to_string()
        } else {
            self.0.to_string()
        };
        let body = Json(json!({
            "success": false,
            "message": message,
        }));
        (status, body).into_response()
    }
}
