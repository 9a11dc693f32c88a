//! REST surface over the indexed event store.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;

pub struct ApiState {
    pub pool: SqlitePool,
}

/// Build the full application router.
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(all_events))
        .route("/questions/:id/events", get(question_events))
        .route("/questions/:id/summary", get(question_summary))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Wrapper turning indexer errors into JSON error responses.
struct ApiError(StatusCode, String);

impl From<IndexerError> for ApiError {
    fn from(e: IndexerError) -> Self {
        ApiError(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.0, Json(json!({ "error": self.1 }))).into_response()
    }
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct EventListResponse {
    count: usize,
    events: Vec<EventRecord>,
}

#[derive(Serialize)]
struct QuestionEventsResponse {
    question_id: String,
    count: usize,
    events: Vec<EventRecord>,
}

/// Aggregate view of one question's indexed history.
#[derive(Serialize)]
struct QuestionSummary {
    question_id: String,
    total_events: i64,
    answers_posted: i64,
    answers_rejected: i64,
    bounty_top_ups: i64,
    resolved: bool,
    cancelled: bool,
    refunded: bool,
    total_paid: i64,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn all_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<EventListResponse>, ApiError> {
    let events = db::all_events(&state.pool).await?;
    Ok(Json(EventListResponse {
        count: events.len(),
        events,
    }))
}

async fn question_events(
    State(state): State<Arc<ApiState>>,
    Path(question_id): Path<String>,
) -> Result<Json<QuestionEventsResponse>, ApiError> {
    let events = db::events_for_question(&state.pool, &question_id).await?;
    Ok(Json(QuestionEventsResponse {
        question_id,
        count: events.len(),
        events,
    }))
}

/// Derive a lifecycle summary from the per-type event counts.
///
/// Responds 404 when no event for the question has been indexed, so callers
/// can distinguish "unknown question" from "question with empty history".
async fn question_summary(
    State(state): State<Arc<ApiState>>,
    Path(question_id): Path<String>,
) -> Result<Json<QuestionSummary>, ApiError> {
    let counts = db::event_counts_for_question(&state.pool, &question_id).await?;
    if counts.is_empty() {
        return Err(ApiError(
            StatusCode::NOT_FOUND,
            format!("no events indexed for question {question_id}"),
        ));
    }
    let total_paid = db::total_paid_for_question(&state.pool, &question_id).await?;

    let count_of = |kind: &str| {
        counts
            .iter()
            .find(|(t, _)| t == kind)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    };

    Ok(Json(QuestionSummary {
        total_events: counts.iter().map(|(_, n)| n).sum(),
        answers_posted: count_of("answer_posted"),
        answers_rejected: count_of("answer_rejected"),
        bounty_top_ups: count_of("bounty_added"),
        resolved: count_of("answer_accepted") > 0,
        cancelled: count_of("question_cancelled") > 0,
        refunded: count_of("bounty_refunded") > 0,
        total_paid,
        question_id,
    }))
}
