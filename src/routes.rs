//! REST endpoints that expose the assessment session to the browser form.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::assessment::{AssessmentSession, FieldValue};
use crate::error::{EditorError, SubmissionError};
use crate::submission::SubmissionOutcome;

/// Shared state for assessment routes.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<AssessmentSession>,
}

/// Body of a field update.
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub value: FieldValue,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse<'a> {
    #[serde(flatten)]
    outcome: &'a SubmissionOutcome,
    artifact_produced: bool,
    notice: &'static str,
}

/// Build the assessment REST routes.
pub fn assessment_routes(session: Arc<AssessmentSession>) -> Router {
    let state = AppState { session };

    Router::new()
        .route("/health", get(health))
        .route("/api/assessment", get(get_status))
        .route("/api/assessment/fields/{field}", put(set_field))
        .route("/api/assessment/vehicles", post(add_vehicle))
        .route("/api/assessment/vehicles/{index}/{field}", put(set_vehicle_field))
        .route("/api/assessment/drivers", post(add_driver))
        .route("/api/assessment/drivers/{index}/{field}", put(set_driver_field))
        .route("/api/assessment/next", post(next_step))
        .route("/api/assessment/previous", post(previous_step))
        .route("/api/assessment/submit", post(submit))
        .route("/api/assessment/artifact", get(download_artifact))
        .route("/api/assessment/reset", post(reset))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "assessment-wizard"
    }))
}

// ── Record & navigation ─────────────────────────────────────────────────

async fn get_status(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.session.status().await)
}

async fn next_step(State(state): State<AppState>) -> impl IntoResponse {
    state.session.advance().await;
    Json(state.session.status().await)
}

async fn previous_step(State(state): State<AppState>) -> impl IntoResponse {
    state.session.retreat().await;
    Json(state.session.status().await)
}

// ── Field edits ─────────────────────────────────────────────────────────

fn editor_error(e: EditorError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match e {
        EditorError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    };
    (status, Json(serde_json::json!({"error": e.to_string()})))
}

fn updated() -> (StatusCode, Json<serde_json::Value>) {
    (StatusCode::OK, Json(serde_json::json!({"status": "updated"})))
}

async fn set_field(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(body): Json<FieldUpdate>,
) -> impl IntoResponse {
    match state.session.set_scalar(&field, body.value).await {
        Ok(()) => updated(),
        Err(e) => editor_error(e),
    }
}

async fn set_vehicle_field(
    State(state): State<AppState>,
    Path((index, field)): Path<(usize, String)>,
    Json(body): Json<FieldUpdate>,
) -> impl IntoResponse {
    match state.session.set_vehicle_field(index, &field, body.value).await {
        Ok(()) => updated(),
        Err(e) => editor_error(e),
    }
}

async fn set_driver_field(
    State(state): State<AppState>,
    Path((index, field)): Path<(usize, String)>,
    Json(body): Json<FieldUpdate>,
) -> impl IntoResponse {
    match state.session.set_driver_field(index, &field, body.value).await {
        Ok(()) => updated(),
        Err(e) => editor_error(e),
    }
}

async fn add_vehicle(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.session.add_vehicle().await;
    (StatusCode::CREATED, Json(serde_json::json!({"count": count})))
}

async fn add_driver(State(state): State<AppState>) -> impl IntoResponse {
    let count = state.session.add_driver().await;
    (StatusCode::CREATED, Json(serde_json::json!({"count": count})))
}

// ── Submission ──────────────────────────────────────────────────────────

/// Submit the assessment.
///
/// A trigger that arrives while a submission is already running is inert:
/// nothing is sent and no outcome is produced. It answers `409` with
/// `{"status": "in_flight"}` and no `notice`, so the form keeps waiting for
/// the running submission instead of showing an error.
async fn submit(State(state): State<AppState>) -> Response {
    match state.session.submit().await {
        Ok(outcome) => Json(SubmitResponse {
            outcome: &outcome,
            artifact_produced: outcome.artifact_produced(),
            notice: outcome.notice(),
        })
        .into_response(),
        Err(SubmissionError::Reentrant) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"status": "in_flight"})),
        )
            .into_response(),
        Err(e @ SubmissionError::NotAtFinalStep { .. }) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

async fn download_artifact(State(state): State<AppState>) -> Response {
    match state.session.artifact().await {
        Some(artifact) => {
            info!(file_name = %artifact.file_name, "Serving assessment document");
            (
                [
                    (header::CONTENT_TYPE, artifact.content_type.to_string()),
                    (header::CONTENT_DISPOSITION, artifact.content_disposition()),
                ],
                artifact.bytes.clone(),
            )
                .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No document has been generated"})),
        )
            .into_response(),
    }
}

async fn reset(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.reset().await {
        Ok(id) => (
            StatusCode::OK,
            Json(serde_json::json!({"assessmentId": id})),
        ),
        Err(_) => (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"status": "in_flight"})),
        ),
    }
}
