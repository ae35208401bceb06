//! Axum route handlers for the Career API.
//!
//! Suggestions are long-lived operations: the POST returns at once with an id
//! and a loading view, and clients poll the GET until the view settles.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::career::form::CareerForm;
use crate::career::suggestion::{CareerSuggestion, CareerSuggestionDisplay};
use crate::errors::AppError;
use crate::lifecycle::{CallError, OperationView, RequestState, View};
use crate::state::AppState;

pub type SuggestionView = OperationView<CareerSuggestionDisplay>;

fn render(id: Uuid, state: &RequestState<CareerSuggestion>) -> SuggestionView {
    OperationView {
        id,
        view: View::from_state(state).map(CareerSuggestionDisplay::from),
    }
}

fn check(form: &CareerForm) -> Result<(), AppError> {
    let problems = form.validate();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(CallError::validation(problems.join(" ")).into())
    }
}

/// POST /api/v1/career/suggestions
///
/// Validates the questionnaire and starts a suggestion. Returns 202 with the
/// operation id.
pub async fn handle_create_suggestion(
    State(state): State<AppState>,
    Json(form): Json<CareerForm>,
) -> Result<(StatusCode, Json<SuggestionView>), AppError> {
    check(&form)?;

    let (id, snapshot) = state.career.create(form)?;
    info!(%id, "career suggestion started");

    Ok((StatusCode::ACCEPTED, Json(render(id, &snapshot))))
}

/// GET /api/v1/career/suggestions/:id
pub async fn handle_get_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SuggestionView>, AppError> {
    let snapshot = state.career.get(id)?;
    Ok(Json(render(id, &snapshot)))
}

/// PUT /api/v1/career/suggestions/:id
///
/// Resubmits with an edited questionnaire. Whatever the previous attempt
/// produces from now on is discarded.
pub async fn handle_resubmit_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<CareerForm>,
) -> Result<(StatusCode, Json<SuggestionView>), AppError> {
    check(&form)?;

    let snapshot = state.career.resubmit(id, form)?;
    info!(%id, attempt = ?snapshot.attempt(), "career suggestion resubmitted");

    Ok((StatusCode::ACCEPTED, Json(render(id, &snapshot))))
}

/// POST /api/v1/career/suggestions/:id/retry
///
/// Re-runs the last submitted questionnaire.
pub async fn handle_retry_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SuggestionView>), AppError> {
    let snapshot = state.career.retry(id)?;
    Ok((StatusCode::ACCEPTED, Json(render(id, &snapshot))))
}

/// DELETE /api/v1/career/suggestions/:id
pub async fn handle_delete_suggestion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.career.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}
