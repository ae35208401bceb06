//! Queries over `industry_experts`, `referral_requests` and `profiles`.

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use super::models::{
    attach_requester_names, like_pattern, ExpertSearchParams, ExpertUpdate, IndustryExpert,
    NewExpert, NewReferral, ReferralRequest, ReferralStatus,
};

pub async fn create_expert(pool: &PgPool, expert: &NewExpert) -> Result<IndustryExpert, sqlx::Error> {
    sqlx::query_as::<_, IndustryExpert>(
        r#"
        INSERT INTO industry_experts (user_id, name, organization, role, bio, is_available)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(expert.user_id)
    .bind(expert.name.trim())
    .bind(expert.organization.trim())
    .bind(expert.role.trim())
    .bind(&expert.bio)
    .bind(expert.is_available)
    .fetch_one(pool)
    .await
}

pub async fn get_expert(pool: &PgPool, expert_id: Uuid) -> Result<Option<IndustryExpert>, sqlx::Error> {
    sqlx::query_as::<_, IndustryExpert>("SELECT * FROM industry_experts WHERE id = $1")
        .bind(expert_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_expert_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<IndustryExpert>, sqlx::Error> {
    sqlx::query_as::<_, IndustryExpert>("SELECT * FROM industry_experts WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn update_expert(
    pool: &PgPool,
    expert_id: Uuid,
    update: &ExpertUpdate,
) -> Result<Option<IndustryExpert>, sqlx::Error> {
    sqlx::query_as::<_, IndustryExpert>(
        r#"
        UPDATE industry_experts
        SET name = COALESCE($2, name),
            organization = COALESCE($3, organization),
            role = COALESCE($4, role),
            bio = COALESCE($5, bio),
            is_available = COALESCE($6, is_available)
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(expert_id)
    .bind(update.name.as_deref().map(str::trim))
    .bind(update.organization.as_deref().map(str::trim))
    .bind(update.role.as_deref().map(str::trim))
    .bind(&update.bio)
    .bind(update.is_available)
    .fetch_optional(pool)
    .await
}

/// Available experts matching every given term as a case-insensitive
/// substring. No terms lists all available experts.
pub async fn search_experts(
    pool: &PgPool,
    params: &ExpertSearchParams,
) -> Result<Vec<IndustryExpert>, sqlx::Error> {
    sqlx::query_as::<_, IndustryExpert>(
        r#"
        SELECT * FROM industry_experts
        WHERE is_available = TRUE
          AND ($1::text IS NULL OR organization ILIKE $1)
          AND ($2::text IS NULL OR role ILIKE $2)
          AND ($3::text IS NULL OR name ILIKE $3)
        ORDER BY name
        "#,
    )
    .bind(like_pattern(params.organization.as_deref()))
    .bind(like_pattern(params.role.as_deref()))
    .bind(like_pattern(params.name.as_deref()))
    .fetch_all(pool)
    .await
}

pub async fn create_referral(
    pool: &PgPool,
    referral: &NewReferral,
) -> Result<ReferralRequest, sqlx::Error> {
    sqlx::query_as::<_, ReferralRequest>(
        r#"
        INSERT INTO referral_requests
            (user_id, expert_id, resume_url, request_message, target_role, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(referral.user_id)
    .bind(referral.expert_id)
    .bind(referral.resume_url.trim())
    .bind(referral.request_message.trim())
    .bind(referral.target_role.trim())
    .bind(ReferralStatus::Pending.as_str())
    .fetch_one(pool)
    .await
}

pub async fn list_user_referrals(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ReferralRequest>, sqlx::Error> {
    sqlx::query_as::<_, ReferralRequest>(
        "SELECT * FROM referral_requests WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// An expert's inbox, newest first, with each requester's name attached.
pub async fn list_expert_referrals(
    pool: &PgPool,
    expert_id: Uuid,
) -> Result<Vec<ReferralRequest>, sqlx::Error> {
    let requests = sqlx::query_as::<_, ReferralRequest>(
        "SELECT * FROM referral_requests WHERE expert_id = $1 ORDER BY created_at DESC",
    )
    .bind(expert_id)
    .fetch_all(pool)
    .await?;

    if requests.is_empty() {
        return Ok(requests);
    }

    let user_ids: Vec<Uuid> = requests.iter().map(|r| r.user_id).collect();
    let profiles = sqlx::query_as::<_, (Uuid, Option<String>)>(
        "SELECT id, name FROM profiles WHERE id = ANY($1)",
    )
    .bind(&user_ids)
    .fetch_all(pool)
    .await?;

    let names: HashMap<Uuid, String> = profiles
        .into_iter()
        .filter_map(|(id, name)| name.map(|name| (id, name)))
        .collect();

    Ok(attach_requester_names(requests, &names))
}

pub async fn update_referral_status(
    pool: &PgPool,
    referral_id: Uuid,
    status: ReferralStatus,
    feedback: Option<&str>,
) -> Result<Option<ReferralRequest>, sqlx::Error> {
    sqlx::query_as::<_, ReferralRequest>(
        r#"
        UPDATE referral_requests
        SET status = $2,
            feedback = COALESCE($3, feedback),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(referral_id)
    .bind(status.as_str())
    .bind(feedback)
    .fetch_optional(pool)
    .await
}
