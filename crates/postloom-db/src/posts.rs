//! Database operations for the `generated_posts` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `generated_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeneratedPostRow {
    pub id: i64,
    pub public_id: Uuid,
    pub brief_id: i64,
    pub platform: String,
    pub generated_text: String,
    pub generated_media_urls: Option<Vec<String>>,
    pub status: String,
    pub schedule_time: Option<DateTime<Utc>>,
    pub posted_at: Option<DateTime<Utc>>,
    pub post_url: Option<String>,
    pub posting_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a new `draft` post for a brief and returns the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_draft_post(
    pool: &PgPool,
    brief_id: i64,
    platform: &str,
    generated_text: &str,
    media_urls: Option<&[String]>,
) -> Result<GeneratedPostRow, DbError> {
    let row = sqlx::query_as::<_, GeneratedPostRow>(
        "INSERT INTO generated_posts (brief_id, platform, generated_text, generated_media_urls) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, public_id, brief_id, platform, generated_text, generated_media_urls, \
                   status, schedule_time, posted_at, post_url, posting_error, \
                   created_at, updated_at",
    )
    .bind(brief_id)
    .bind(platform)
    .bind(generated_text)
    .bind(media_urls)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns all posts belonging to a brief, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts_for_brief(
    pool: &PgPool,
    brief_id: i64,
) -> Result<Vec<GeneratedPostRow>, DbError> {
    let rows = sqlx::query_as::<_, GeneratedPostRow>(
        "SELECT id, public_id, brief_id, platform, generated_text, generated_media_urls, \
                status, schedule_time, posted_at, post_url, posting_error, \
                created_at, updated_at \
         FROM generated_posts \
         WHERE brief_id = $1 \
         ORDER BY created_at, id",
    )
    .bind(brief_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single post by public id, scoped through its brief to the owning
/// user, or `None` if not found. Ownership lives on the brief, so the lookup
/// joins `content_briefs`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post_for_user(
    pool: &PgPool,
    public_id: Uuid,
    user_id: Uuid,
) -> Result<Option<GeneratedPostRow>, DbError> {
    let row = sqlx::query_as::<_, GeneratedPostRow>(
        "SELECT gp.id, gp.public_id, gp.brief_id, gp.platform, gp.generated_text, \
                gp.generated_media_urls, gp.status, gp.schedule_time, gp.posted_at, \
                gp.post_url, gp.posting_error, gp.created_at, gp.updated_at \
         FROM generated_posts gp \
         JOIN content_briefs cb ON cb.id = gp.brief_id \
         WHERE gp.public_id = $1 AND cb.user_id = $2",
    )
    .bind(public_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Moves a `draft` post to `ready_to_post`, optionally recording a requested
/// schedule time.
///
/// # Errors
///
/// Returns [`DbError::InvalidPostTransition`] if the post is not currently
/// `draft`, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_post_ready(
    pool: &PgPool,
    id: i64,
    schedule_time: Option<DateTime<Utc>>,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE generated_posts \
         SET status = 'ready_to_post', schedule_time = $1, updated_at = NOW() \
         WHERE id = $2 AND status = 'draft'",
    )
    .bind(schedule_time)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidPostTransition {
            id,
            expected_status: "draft",
        });
    }

    Ok(())
}

/// Atomically claims up to `batch_size` `ready_to_post` posts by moving them
/// to `publishing`, and returns the claimed rows, oldest first.
///
/// `FOR UPDATE SKIP LOCKED` in the selecting subquery means two workers
/// claiming concurrently partition the ready set instead of double-claiming.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn claim_ready_posts(
    pool: &PgPool,
    batch_size: i64,
) -> Result<Vec<GeneratedPostRow>, DbError> {
    let rows = sqlx::query_as::<_, GeneratedPostRow>(
        "UPDATE generated_posts \
         SET status = 'publishing', updated_at = NOW() \
         WHERE id IN ( \
             SELECT id FROM generated_posts \
             WHERE status = 'ready_to_post' \
             ORDER BY created_at, id \
             LIMIT $1 \
             FOR UPDATE SKIP LOCKED \
         ) \
         RETURNING id, public_id, brief_id, platform, generated_text, generated_media_urls, \
                   status, schedule_time, posted_at, post_url, posting_error, \
                   created_at, updated_at",
    )
    .bind(batch_size)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Marks a claimed post as `posted`, recording the delivery timestamp and the
/// platform URL.
///
/// # Errors
///
/// Returns [`DbError::InvalidPostTransition`] if the post is not currently
/// `publishing`, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_post_posted(pool: &PgPool, id: i64, post_url: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE generated_posts \
         SET status = 'posted', posted_at = NOW(), post_url = $1, updated_at = NOW() \
         WHERE id = $2 AND status = 'publishing'",
    )
    .bind(post_url)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidPostTransition {
            id,
            expected_status: "publishing",
        });
    }

    Ok(())
}

/// Marks a claimed post as `error`, recording the delivery failure reason.
///
/// # Errors
///
/// Returns [`DbError::InvalidPostTransition`] if the post is not currently
/// `publishing`, or [`DbError::Sqlx`] if the update fails.
pub async fn mark_post_failed(pool: &PgPool, id: i64, reason: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE generated_posts \
         SET status = 'error', posting_error = $1, updated_at = NOW() \
         WHERE id = $2 AND status = 'publishing'",
    )
    .bind(reason)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidPostTransition {
            id,
            expected_status: "publishing",
        });
    }

    Ok(())
}
