pub mod health;
pub mod waitlist;

use axum::Router;

use crate::adapters::http::app_state::AppState;

/// Routes mounted under `/api`.
pub fn router(app_state: AppState) -> Router<AppState> {
    Router::new().merge(waitlist::router(app_state))
}
