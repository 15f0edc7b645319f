//! Brief endpoints: campaign generation, the recent-briefs feed, and the
//! brief detail view.

use axum::extract::{Extension, Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use postloom_pipeline::{run_brief_generation, BriefRequest, PipelineError};

use super::{map_db_error, normalize_limit, ApiError, AppState};
use crate::middleware::AuthUser;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /api/v1/briefs`. Everything is optional at the serde layer
/// so that missing and blank fields produce the same validation error instead
/// of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct CreateBriefRequest {
    #[serde(default)]
    brand_id: Option<String>,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    goal: Option<String>,
    #[serde(default)]
    cta: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreateBriefResponse {
    success: bool,
    brief_id: Uuid,
    posts_generated: usize,
    message: String,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListBriefsQuery {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct BriefSummaryItem {
    brief_id: Uuid,
    topic: String,
    goal: String,
    status: String,
    brand_name: String,
    posts_count: i64,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ListBriefsResponse {
    briefs: Vec<BriefSummaryItem>,
}

#[derive(Debug, Serialize)]
struct BriefBrand {
    brand_id: Uuid,
    name: String,
    tone_of_voice: String,
}

#[derive(Debug, Serialize)]
struct BriefPostItem {
    post_id: Uuid,
    platform: String,
    generated_text: String,
    status: String,
    schedule_time: Option<DateTime<Utc>>,
    posted_at: Option<DateTime<Utc>>,
    post_url: Option<String>,
    posting_error: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BriefDetailResponse {
    brief_id: Uuid,
    topic: String,
    goal: String,
    cta: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    brand: BriefBrand,
    posts: Vec<BriefPostItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `POST /api/v1/briefs`: run the full generation pipeline for one campaign
/// request and report the outcome.
pub(in crate::api) async fn create_brief(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(request): Json<CreateBriefRequest>,
) -> Result<Json<CreateBriefResponse>, ApiError> {
    let brand_id = request.brand_id.as_deref().map_or("", str::trim);
    let topic = request.topic.as_deref().map_or("", str::trim);
    if brand_id.is_empty() || topic.is_empty() {
        return Err(ApiError::validation(
            "Missing required fields: brandId, topic",
        ));
    }
    // A malformed id cannot match any brand; report it the same way as an
    // unknown one.
    let brand_id = Uuid::parse_str(brand_id)
        .map_err(|_| ApiError::not_found("Brand not found or unauthorized"))?;

    let brief_request = BriefRequest {
        brand_id,
        topic: topic.to_string(),
        goal: request.goal,
        cta: request.cta,
    };
    let outcome = run_brief_generation(
        &state.pool,
        &state.chat,
        &state.generation,
        user_id,
        &brief_request,
    )
    .await
    .map_err(map_pipeline_error)?;

    Ok(Json(CreateBriefResponse {
        success: true,
        brief_id: outcome.brief_id,
        posts_generated: outcome.posts_generated,
        message: format!(
            "Successfully generated {} posts for your campaign!",
            outcome.posts_generated
        ),
    }))
}

/// `GET /api/v1/briefs`: the recent-briefs feed for the calling user.
pub(in crate::api) async fn list_briefs(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Query(query): Query<ListBriefsQuery>,
) -> Result<Json<ListBriefsResponse>, ApiError> {
    let limit = normalize_limit(query.limit);
    let rows = postloom_db::list_briefs_for_user(&state.pool, user_id, limit)
        .await
        .map_err(|e| map_db_error(&e))?;

    let briefs = rows
        .into_iter()
        .map(|row| BriefSummaryItem {
            brief_id: row.public_id,
            topic: row.topic,
            goal: row.goal,
            status: row.status,
            brand_name: row.brand_name,
            posts_count: row.posts_count,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ListBriefsResponse { briefs }))
}

/// `GET /api/v1/briefs/{brief_id}`: one brief with its brand block and all
/// generated posts.
pub(in crate::api) async fn get_brief(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(brief_id): Path<String>,
) -> Result<Json<BriefDetailResponse>, ApiError> {
    let public_id =
        Uuid::parse_str(brief_id.trim()).map_err(|_| ApiError::not_found("Brief not found"))?;

    let brief = postloom_db::get_brief_for_user(&state.pool, public_id, user_id)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or_else(|| ApiError::not_found("Brief not found"))?;

    // The brand row outlives deletion (soft delete), so a brief can always
    // render its brand.
    let brand = postloom_db::get_brand_by_id(&state.pool, brief.brand_id)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or_else(|| {
            tracing::error!(
                brief_id = %brief.public_id,
                brand_id = brief.brand_id,
                "brief references a missing brand"
            );
            ApiError::internal("brief references a missing brand")
        })?;

    let posts = postloom_db::list_posts_for_brief(&state.pool, brief.id)
        .await
        .map_err(|e| map_db_error(&e))?
        .into_iter()
        .map(|row| BriefPostItem {
            post_id: row.public_id,
            platform: row.platform,
            generated_text: row.generated_text,
            status: row.status,
            schedule_time: row.schedule_time,
            posted_at: row.posted_at,
            post_url: row.post_url,
            posting_error: row.posting_error,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(BriefDetailResponse {
        brief_id: brief.public_id,
        topic: brief.topic,
        goal: brief.goal,
        cta: brief.cta_text,
        status: brief.status,
        created_at: brief.created_at,
        brand: BriefBrand {
            brand_id: brand.public_id,
            name: brand.name,
            tone_of_voice: brand.tone_of_voice,
        },
        posts,
    }))
}

fn map_pipeline_error(error: PipelineError) -> ApiError {
    match error {
        PipelineError::Validation(message) => ApiError::validation(message),
        PipelineError::NotFound => ApiError::not_found("Brand not found or unauthorized"),
        other => {
            tracing::error!(error = %other, "brief generation failed");
            ApiError::internal(other.to_string())
        }
    }
}
