use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Shown for any storage or internal failure; details stay in the logs.
pub const GENERIC_FAILURE_MESSAGE: &str = "We hit a snag processing your request.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the error before it gets converted into a status response.
        match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = ?self, "Request failed")
            }
            _ => tracing::debug!(error = %self, "Request rejected"),
        }

        match self {
            AppError::Database(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::DatabaseError,
                GENERIC_FAILURE_MESSAGE.to_string(),
            ),
            AppError::InvalidInput(msg) => {
                error_resp(StatusCode::BAD_REQUEST, ErrorCode::InvalidInput, msg)
            }
            AppError::DuplicateEmail => error_resp(
                StatusCode::CONFLICT,
                ErrorCode::AlreadyJoined,
                AppError::DuplicateEmail.to_string(),
            ),
            AppError::Unauthorized => error_resp(
                StatusCode::UNAUTHORIZED,
                ErrorCode::Unauthorized,
                "A valid admin token is required.".to_string(),
            ),
            AppError::NotFound => {
                error_resp(StatusCode::NOT_FOUND, ErrorCode::NotFound, "Not found".to_string())
            }
            AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalError,
                GENERIC_FAILURE_MESSAGE.to_string(),
            ),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: String) -> Response {
    let body = serde_json::json!({ "code": code.as_str(), "error": message });
    (status, Json(body)).into_response()
}
