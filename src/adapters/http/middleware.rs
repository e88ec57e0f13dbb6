use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;

use crate::{adapters::http::app_state::AppState, app_error::AppError};

/// Gate admin routes behind `Authorization: Bearer <ADMIN_TOKEN>`.
/// Without a configured token the routes stay open.
pub async fn require_admin_token(
    State(app_state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = &app_state.config.admin_token {
        let provided = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token);

        let authorized = provided.is_some_and(|token| tokens_match(token, expected.expose_secret()));
        tracing::debug!(
            token_present = provided.is_some(),
            authorized,
            "Checking admin token"
        );

        if !authorized {
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Constant-time comparison of the presented token against the configured one.
fn tokens_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
