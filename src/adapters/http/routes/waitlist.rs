use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    http::{
        HeaderValue, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{app_state::AppState, middleware::require_admin_token},
    app_error::{AppError, AppResult, ErrorCode},
    application::use_cases::waitlist::{JoinOutcome, effective_limit},
    domain::entities::waitlist_entry::WaitlistEntry,
};

const JOINED_MESSAGE: &str = "You're on the waitlist! We'll reach out as invites roll out.";
const INVALID_JSON_MESSAGE: &str = "Invalid JSON payload";

pub fn router(app_state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/waitlist/entries", get(list_entries))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            require_admin_token,
        ));

    Router::new()
        .route("/waitlist", get(get_count).post(join_waitlist))
        .merge(admin)
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Deserialize)]
struct JoinWaitlistPayload {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Serialize)]
struct JoinWaitlistResponse {
    message: &'static str,
    email: String,
    count: i64,
}

#[derive(Serialize)]
struct AlreadyJoinedResponse {
    code: &'static str,
    error: String,
    count: i64,
}

#[derive(Serialize)]
struct CountResponse {
    count: i64,
}

/// Query parameters for the entries listing. Repeated keys keep their first
/// value, and values stay text so a malformed `limit` means "no limit".
#[derive(Debug, Default)]
struct EntriesQuery {
    format: Option<String>,
    limit: Option<String>,
}

impl EntriesQuery {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "format" if query.format.is_none() => query.format = Some(value),
                "limit" if query.limit.is_none() => query.limit = Some(value),
                _ => {}
            }
        }
        query
    }
}

#[derive(Serialize)]
struct EntryResponse {
    name: String,
    email: String,
    created_at: String,
}

impl From<WaitlistEntry> for EntryResponse {
    fn from(entry: WaitlistEntry) -> Self {
        let created_at = entry.created_at_display();
        Self {
            name: entry.name,
            email: entry.email,
            created_at,
        }
    }
}

#[derive(Serialize)]
struct EntriesResponse {
    /// Total stored entries, independent of `limit`.
    count: i64,
    limit: Option<i64>,
    entries: Vec<EntryResponse>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/waitlist
/// Public signup. 201 on success, 409 with the current count on a duplicate email.
async fn join_waitlist(
    State(app_state): State<AppState>,
    payload: Result<Json<JoinWaitlistPayload>, JsonRejection>,
) -> AppResult<Response> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected waitlist payload");
        AppError::InvalidInput(INVALID_JSON_MESSAGE.into())
    })?;

    let outcome = app_state
        .waitlist_use_cases
        .join(
            payload.name.as_deref().unwrap_or_default(),
            payload.email.as_deref().unwrap_or_default(),
        )
        .await?;

    let response = match outcome {
        JoinOutcome::Joined { entry, count } => (
            StatusCode::CREATED,
            Json(JoinWaitlistResponse {
                message: JOINED_MESSAGE,
                email: entry.email,
                count,
            }),
        )
            .into_response(),
        JoinOutcome::AlreadyJoined { count } => (
            StatusCode::CONFLICT,
            Json(AlreadyJoinedResponse {
                code: ErrorCode::AlreadyJoined.as_str(),
                error: AppError::DuplicateEmail.to_string(),
                count,
            }),
        )
            .into_response(),
    };

    Ok(response)
}

/// GET /api/waitlist
async fn get_count(State(app_state): State<AppState>) -> AppResult<impl IntoResponse> {
    let count = app_state.waitlist_use_cases.count().await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/waitlist/entries?format=csv&limit=N
/// Admin listing, newest first, as JSON or as a CSV download.
async fn list_entries(
    State(app_state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Response> {
    let query = EntriesQuery::from_pairs(pairs);
    let limit = parse_limit(query.limit.as_deref());

    if wants_csv(query.format.as_deref()) {
        let csv = app_state.waitlist_use_cases.export_csv(limit).await?;
        let disposition = HeaderValue::from_str(&format!(
            "attachment; filename=\"{}\"",
            app_state.config.csv_filename
        ))
        .map_err(|e| AppError::Internal(format!("Invalid Content-Disposition: {e}")))?;

        return Ok((
            [
                (CONTENT_TYPE, HeaderValue::from_static("text/csv; charset=utf-8")),
                (CONTENT_DISPOSITION, disposition),
            ],
            csv,
        )
            .into_response());
    }

    let entries = app_state.waitlist_use_cases.list_entries(limit).await?;
    let count = app_state.waitlist_use_cases.count().await?;

    Ok(Json(EntriesResponse {
        count,
        limit,
        entries: entries.into_iter().map(EntryResponse::from).collect(),
    })
    .into_response())
}

/// Non-numeric, zero and negative limits all mean "no limit".
fn parse_limit(raw: Option<&str>) -> Option<i64> {
    effective_limit(raw.and_then(|l| l.trim().parse::<i64>().ok()))
}

fn wants_csv(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("csv"))
}
