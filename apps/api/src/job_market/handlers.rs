//! Axum route handlers for the job-market dashboard widgets.
//!
//! Each widget loads independently: a slow or failed feed only affects its
//! own response.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::job_market::data::{IndustryInsight, JobTrend, TopSkill};
use crate::job_market::feed::Feed;
use crate::lifecycle::{run_once, ExternalCall, OperationPolicy, View};
use crate::state::AppState;

async fn load<T>(feed: Feed<T>, policy: OperationPolicy) -> Result<Json<View<Vec<T>>>, AppError>
where
    Feed<T>: ExternalCall<Input = (), Output = Vec<T>>,
{
    let view = run_once(feed.name(), feed, policy, ()).await?;
    Ok(Json(view))
}

/// GET /api/v1/job-market/trends
pub async fn handle_job_trends(
    State(state): State<AppState>,
) -> Result<Json<View<Vec<JobTrend>>>, AppError> {
    load(Feed::job_trends(), state.config.policies.job_trends).await
}

/// GET /api/v1/job-market/skills
pub async fn handle_top_skills(
    State(state): State<AppState>,
) -> Result<Json<View<Vec<TopSkill>>>, AppError> {
    load(Feed::top_skills(), state.config.policies.top_skills).await
}

/// GET /api/v1/job-market/insights
pub async fn handle_industry_insights(
    State(state): State<AppState>,
) -> Result<Json<View<Vec<IndustryInsight>>>, AppError> {
    load(Feed::industry_insights(), state.config.policies.industry_insights).await
}
