//! Brand CRUD endpoints.

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use super::{map_db_error, ApiError, AppState};
use crate::middleware::AuthUser;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct CreateBrandRequest {
    pub name: String,
    pub description: String,
    pub tone_of_voice: String,
    pub logo_url: Option<String>,
}

// Option<Option<T>> is intentional: outer None = "not in request" (keep current),
// Some(None) = "explicitly cleared", Some(Some(v)) = "set to value" (PATCH semantics).
#[allow(clippy::option_option)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct UpdateBrandRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tone_of_voice: Option<String>,
    #[serde(default, deserialize_with = "clearable")]
    pub logo_url: Option<Option<String>>,
}

/// Keeps an explicit `null` distinguishable from an absent field: any present
/// value, `null` included, arrives as `Some(...)`.
fn clearable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
struct BrandItem {
    brand_id: Uuid,
    name: String,
    description: String,
    tone_of_voice: String,
    logo_url: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ListBrandsResponse {
    brands: Vec<BrandItem>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Looks up a brand by its public-id path segment, scoped to the calling
/// user. Malformed, unknown, and foreign ids all answer the same way.
async fn resolve_brand(
    pool: &PgPool,
    raw_id: &str,
    user_id: Uuid,
) -> Result<postloom_db::BrandRow, ApiError> {
    let public_id = Uuid::parse_str(raw_id.trim())
        .map_err(|_| ApiError::not_found("Brand not found or unauthorized"))?;
    postloom_db::get_brand_for_user(pool, public_id, user_id)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or_else(|| ApiError::not_found("Brand not found or unauthorized"))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/brands — create a new brand.
pub(in crate::api) async fn create_brand(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(body): Json<CreateBrandRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let name = body.name.trim().to_owned();
    if name.is_empty() || name.len() > 200 {
        return Err(ApiError::validation("name must be 1–200 characters"));
    }
    let description = body.description.trim().to_owned();
    if description.is_empty() {
        return Err(ApiError::validation("description must not be empty"));
    }
    let tone_of_voice = body.tone_of_voice.trim().to_owned();
    if tone_of_voice.is_empty() {
        return Err(ApiError::validation("toneOfVoice must not be empty"));
    }
    let logo_url = body
        .logo_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty());

    let row = postloom_db::create_brand(
        &state.pool,
        user_id,
        &name,
        &description,
        &tone_of_voice,
        logo_url,
    )
    .await
    .map_err(|e| map_db_error(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "brand_id": row.public_id })),
    ))
}

/// GET /api/v1/brands — all of the calling user's brands, newest first.
pub(in crate::api) async fn list_brands(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<ListBrandsResponse>, ApiError> {
    let rows = postloom_db::list_brands_for_user(&state.pool, user_id)
        .await
        .map_err(|e| map_db_error(&e))?;

    let brands = rows
        .into_iter()
        .map(|row| BrandItem {
            brand_id: row.public_id,
            name: row.name,
            description: row.description,
            tone_of_voice: row.tone_of_voice,
            logo_url: row.logo_url,
            created_at: row.created_at,
        })
        .collect();

    Ok(Json(ListBrandsResponse { brands }))
}

/// PATCH /api/v1/brands/{brand_id} — update brand metadata (sparse).
pub(in crate::api) async fn update_brand(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(brand_id): Path<String>,
    Json(body): Json<UpdateBrandRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let brand = resolve_brand(&state.pool, &brand_id, user_id).await?;

    let trimmed_name = body.name.as_ref().map(|n| n.trim().to_owned());
    if let Some(ref name) = trimmed_name {
        if name.is_empty() || name.len() > 200 {
            return Err(ApiError::validation("name must be 1–200 characters"));
        }
    }
    let trimmed_description = body.description.as_ref().map(|d| d.trim().to_owned());
    if let Some(ref description) = trimmed_description {
        if description.is_empty() {
            return Err(ApiError::validation("description must not be empty"));
        }
    }
    let trimmed_tone = body.tone_of_voice.as_ref().map(|t| t.trim().to_owned());
    if let Some(ref tone) = trimmed_tone {
        if tone.is_empty() {
            return Err(ApiError::validation("toneOfVoice must not be empty"));
        }
    }
    // A blank string clears the logo the same way an explicit null does.
    let logo_url = body
        .logo_url
        .as_ref()
        .map(|opt| opt.as_deref().map(str::trim).filter(|u| !u.is_empty()));

    postloom_db::update_brand(
        &state.pool,
        brand.id,
        trimmed_name.as_deref(),
        trimmed_description.as_deref(),
        trimmed_tone.as_deref(),
        logo_url,
    )
    .await
    .map_err(|e| map_db_error(&e))?;

    Ok(Json(serde_json::json!({ "updated": true })))
}

/// DELETE /api/v1/brands/{brand_id} — soft-delete a brand.
pub(in crate::api) async fn delete_brand(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(brand_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let brand = resolve_brand(&state.pool, &brand_id, user_id).await?;

    postloom_db::delete_brand(&state.pool, brand.id)
        .await
        .map_err(|e| map_db_error(&e))?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}
