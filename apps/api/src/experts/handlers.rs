//! Axum route handlers for expert profiles and referral requests.
//!
//! Authentication is handled upstream; callers pass the acting `user_id`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::experts::models::{
    ExpertSearchParams, ExpertUpdate, IndustryExpert, NewExpert, NewReferral, ReferralRequest,
    StatusUpdate,
};
use crate::experts::repository;
use crate::state::AppState;

fn expert_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Expert {id} not found"))
}

/// POST /api/v1/experts
pub async fn handle_create_expert(
    State(state): State<AppState>,
    Json(expert): Json<NewExpert>,
) -> Result<(StatusCode, Json<IndustryExpert>), AppError> {
    expert.validate().map_err(AppError::Validation)?;

    if repository::get_expert_by_user(&state.db, expert.user_id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "User {} already has an expert profile",
            expert.user_id
        )));
    }

    let created = repository::create_expert(&state.db, &expert).await?;
    info!(expert_id = %created.id, "expert profile created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/experts/search?organization=&role=&name=
pub async fn handle_search_experts(
    State(state): State<AppState>,
    Query(params): Query<ExpertSearchParams>,
) -> Result<Json<Vec<IndustryExpert>>, AppError> {
    let experts = repository::search_experts(&state.db, &params).await?;
    Ok(Json(experts))
}

/// GET /api/v1/experts/:id
pub async fn handle_get_expert(
    State(state): State<AppState>,
    Path(expert_id): Path<Uuid>,
) -> Result<Json<IndustryExpert>, AppError> {
    repository::get_expert(&state.db, expert_id)
        .await?
        .map(Json)
        .ok_or_else(|| expert_not_found(expert_id))
}

/// GET /api/v1/experts/by-user/:user_id
pub async fn handle_get_expert_by_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<IndustryExpert>, AppError> {
    repository::get_expert_by_user(&state.db, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No expert profile for user {user_id}")))
}

/// PUT /api/v1/experts/:id
pub async fn handle_update_expert(
    State(state): State<AppState>,
    Path(expert_id): Path<Uuid>,
    Json(update): Json<ExpertUpdate>,
) -> Result<Json<IndustryExpert>, AppError> {
    update.validate().map_err(AppError::Validation)?;

    repository::update_expert(&state.db, expert_id, &update)
        .await?
        .map(Json)
        .ok_or_else(|| expert_not_found(expert_id))
}

/// GET /api/v1/experts/:id/referrals
///
/// The expert's inbox, newest first, with requester names.
pub async fn handle_expert_referrals(
    State(state): State<AppState>,
    Path(expert_id): Path<Uuid>,
) -> Result<Json<Vec<ReferralRequest>>, AppError> {
    if repository::get_expert(&state.db, expert_id).await?.is_none() {
        return Err(expert_not_found(expert_id));
    }

    let requests = repository::list_expert_referrals(&state.db, expert_id).await?;
    Ok(Json(requests))
}

/// POST /api/v1/referrals
pub async fn handle_create_referral(
    State(state): State<AppState>,
    Json(referral): Json<NewReferral>,
) -> Result<(StatusCode, Json<ReferralRequest>), AppError> {
    referral.validate().map_err(AppError::Validation)?;

    if repository::get_expert(&state.db, referral.expert_id)
        .await?
        .is_none()
    {
        return Err(expert_not_found(referral.expert_id));
    }

    let created = repository::create_referral(&state.db, &referral).await?;
    info!(referral_id = %created.id, expert_id = %created.expert_id, "referral requested");

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/users/:user_id/referrals
pub async fn handle_user_referrals(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Vec<ReferralRequest>>, AppError> {
    let requests = repository::list_user_referrals(&state.db, user_id).await?;
    Ok(Json(requests))
}

/// PATCH /api/v1/referrals/:id
///
/// Accepts or rejects a request, optionally with feedback for the requester.
pub async fn handle_update_referral_status(
    State(state): State<AppState>,
    Path(referral_id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ReferralRequest>, AppError> {
    update.validate().map_err(AppError::Validation)?;

    let updated =
        repository::update_referral_status(&state.db, referral_id, update.status, update.feedback())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Referral {referral_id} not found")))?;
    info!(%referral_id, status = %update.status, "referral answered");

    Ok(Json(updated))
}
