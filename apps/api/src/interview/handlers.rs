//! Axum route handlers for the mock interview.
//!
//! Each question is a request-scoped operation: the handler waits for it to
//! settle and returns the updated transcript together with the view. If the
//! client goes away the operation is dropped and the call is cancelled.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::question::InterviewCall;
use crate::interview::transcript::{
    avoid_repeat, kickoff_message, opening_message, TranscriptMessage,
};
use crate::lifecycle::{run_once, View};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub job_role: String,
}

#[derive(Debug, Deserialize)]
pub struct ReplyRequest {
    pub job_role: String,
    #[serde(default)]
    pub messages: Vec<TranscriptMessage>,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveSessionRequest {
    pub user_id: Uuid,
    pub job_role: String,
    pub messages: Vec<TranscriptMessage>,
}

/// The transcript after this turn plus the state of the question request.
/// On failure the transcript holds everything but the missing question.
#[derive(Debug, Serialize)]
pub struct InterviewTurn {
    pub messages: Vec<TranscriptMessage>,
    #[serde(flatten)]
    pub view: View<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveSessionResponse {
    pub id: Uuid,
}

fn required(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interview/start
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<Json<InterviewTurn>, AppError> {
    required(&request.job_role, "job_role")?;
    let job_role = request.job_role.trim();
    info!(job_role, "interview started");

    let view = run_once(
        "interview_question",
        InterviewCall::new(Arc::clone(&state.llm)),
        state.config.policies.interview,
        vec![kickoff_message(job_role)],
    )
    .await?;

    let mut messages = vec![opening_message(job_role)];
    if let View::Ready { result } = &view {
        messages.push(TranscriptMessage::bot(result.clone()));
    }

    Ok(Json(InterviewTurn { messages, view }))
}

/// POST /api/v1/interview/reply
///
/// Appends the answer and asks for the next question. A question that
/// repeats one of the last few is swapped for a fresh prompt.
pub async fn handle_reply(
    State(state): State<AppState>,
    Json(request): Json<ReplyRequest>,
) -> Result<Json<InterviewTurn>, AppError> {
    required(&request.answer, "answer")?;

    let history = request.messages;
    let mut messages = history.clone();
    messages.push(TranscriptMessage::user(request.answer));
    info!(job_role = %request.job_role, turns = messages.len(), "interview reply");

    let view = run_once(
        "interview_question",
        InterviewCall::new(Arc::clone(&state.llm)),
        state.config.policies.interview,
        messages.clone(),
    )
    .await?
    .map(|question| avoid_repeat(question, &history));

    if let View::Ready { result } = &view {
        messages.push(TranscriptMessage::bot(result.clone()));
    }

    Ok(Json(InterviewTurn { messages, view }))
}

/// POST /api/v1/interview/sessions
pub async fn handle_save_session(
    State(state): State<AppState>,
    Json(request): Json<SaveSessionRequest>,
) -> Result<(StatusCode, Json<SaveSessionResponse>), AppError> {
    required(&request.job_role, "job_role")?;

    let messages = serde_json::to_value(&request.messages)
        .map_err(|e| AppError::Internal(e.into()))?;

    let id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO interview_sessions (user_id, job_role, messages)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(request.user_id)
    .bind(&request.job_role)
    .bind(&messages)
    .fetch_one(&state.db)
    .await?;

    info!(%id, user_id = %request.user_id, "interview session saved");
    Ok((StatusCode::CREATED, Json(SaveSessionResponse { id })))
}
