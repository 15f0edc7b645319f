//! Database operations for the `brands` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub public_id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub tone_of_voice: String,
    pub logo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates a new brand row owned by `user_id` and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn create_brand(
    pool: &PgPool,
    user_id: Uuid,
    name: &str,
    description: &str,
    tone_of_voice: &str,
    logo_url: Option<&str>,
) -> Result<BrandRow, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(
        "INSERT INTO brands (user_id, name, description, tone_of_voice, logo_url) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, public_id, user_id, name, description, tone_of_voice, logo_url, \
                   created_at, updated_at, deleted_at",
    )
    .bind(user_id)
    .bind(name)
    .bind(description)
    .bind(tone_of_voice)
    .bind(logo_url)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Returns a single non-deleted brand by public id, scoped to its owner, or
/// `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_for_user(
    pool: &PgPool,
    public_id: Uuid,
    user_id: Uuid,
) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(
        "SELECT id, public_id, user_id, name, description, tone_of_voice, logo_url, \
                created_at, updated_at, deleted_at \
         FROM brands \
         WHERE public_id = $1 AND user_id = $2 AND deleted_at IS NULL",
    )
    .bind(public_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns a brand by internal id, including soft-deleted rows.
///
/// Used when rendering entities that reference the brand (a brief keeps its
/// brand even after the brand is deleted); ownership must already have been
/// established through the referencing row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand_by_id(pool: &PgPool, id: i64) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(
        "SELECT id, public_id, user_id, name, description, tone_of_voice, logo_url, \
                created_at, updated_at, deleted_at \
         FROM brands \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns all non-deleted brands owned by `user_id`, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(
        "SELECT id, public_id, user_id, name, description, tone_of_voice, logo_url, \
                created_at, updated_at, deleted_at \
         FROM brands \
         WHERE user_id = $1 AND deleted_at IS NULL \
         ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Updates metadata fields for an existing brand.
///
/// All `Option` fields are overlaid onto the existing row: `Some(v)` sets the value,
/// `None` preserves the existing value. Uses `COALESCE` in a single `UPDATE … RETURNING`
/// statement to eliminate the race condition of a separate SELECT + UPDATE.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn update_brand(
    pool: &PgPool,
    brand_id: i64,
    name: Option<&str>,
    description: Option<&str>,
    tone_of_voice: Option<&str>,
    logo_url: Option<Option<&str>>,
) -> Result<BrandRow, DbError> {
    // For the nullable column (Option<Option<&str>>), we need to distinguish between:
    //   - None        => keep existing value
    //   - Some(None)  => set to NULL
    //   - Some(value) => set to value
    // We use a bool flag to indicate "was supplied" and the value itself.
    let logo_url_supplied = logo_url.is_some();
    let logo_url_val = logo_url.flatten();

    let row = sqlx::query_as::<_, BrandRow>(
        "UPDATE brands \
         SET name          = COALESCE($2, name), \
             description   = COALESCE($3, description), \
             tone_of_voice = COALESCE($4, tone_of_voice), \
             logo_url      = CASE WHEN $5::BOOL THEN $6 ELSE logo_url END, \
             updated_at    = NOW() \
         WHERE id = $1 \
         RETURNING id, public_id, user_id, name, description, tone_of_voice, logo_url, \
                   created_at, updated_at, deleted_at",
    )
    .bind(brand_id)
    .bind(name)
    .bind(description)
    .bind(tone_of_voice)
    .bind(logo_url_supplied)
    .bind(logo_url_val)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Soft-deletes a brand by setting `deleted_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn delete_brand(pool: &PgPool, brand_id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE brands \
         SET deleted_at = NOW(), updated_at = NOW() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(brand_id)
    .execute(pool)
    .await?;
    Ok(())
}
